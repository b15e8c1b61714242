//! Locating the build metadata record among a round's elements.

use bindery_model::{
    Element, RoundEnv,
    markers::{BINDING_BUILD_INFO, BUILD_INFO_ELEMENT},
};
use tracing::{debug, warn};

use crate::{BuildMetadata, Error, Result};

/// Produces the build metadata record for a round, if it is visible yet.
///
/// Loaders are pure lookups: they hold no cache, and the coordinator decides
/// when to ask again.
pub trait BuildInfoLoader: Send + Sync {
    /// Look up the record.
    ///
    /// # Errors
    ///
    /// Returns an error only when a record is present but malformed. A record
    /// that hasn't appeared yet is `Ok(None)`.
    fn load(&self, round: &dyn RoundEnv) -> Result<Option<BuildMetadata>>;
}

/// Loads the record from the element carrying the build info marker.
///
/// Root elements annotated with the marker take precedence. Otherwise the
/// well-known carrier element is looked up among everything visible to the
/// round, then any earlier element carrying the marker.
#[derive(Debug, Clone)]
pub struct MarkerLoader {
    marker: String,
    element: String,
}

impl MarkerLoader {
    pub fn new() -> Self {
        Self {
            marker: BINDING_BUILD_INFO.to_string(),
            element: BUILD_INFO_ELEMENT.to_string(),
        }
    }

    /// Use a different carrier element name.
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = element.into();
        self
    }

    fn read(&self, element: &Element) -> Result<Option<BuildMetadata>> {
        match element.annotation(&self.marker) {
            Some(annotation) => {
                BuildMetadata::from_args(&element.display_name(), &annotation.args).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl Default for MarkerLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildInfoLoader for MarkerLoader {
    fn load(&self, round: &dyn RoundEnv) -> Result<Option<BuildMetadata>> {
        let marked = round.annotated_with(&self.marker);
        if let Some(first) = marked.first() {
            if marked.len() > 1 {
                warn!(
                    count = marked.len(),
                    using = %first.display_name(),
                    "multiple build info elements in round"
                );
            }
            return self.read(first);
        }

        if let Some(carrier) = round.lookup(&self.element) {
            return match carrier.annotation(&self.marker) {
                Some(_) => self.read(carrier),
                None => Err(Box::new(Error::MissingMarker {
                    element: carrier.display_name(),
                    marker: self.marker.clone(),
                })),
            };
        }

        // A marked element from an earlier round stays authoritative.
        match round
            .visible_elements()
            .into_iter()
            .find(|e| e.has_annotation(&self.marker))
        {
            Some(earlier) => self.read(earlier),
            None => {
                debug!(round = round.number(), "build info not visible yet");
                Ok(None)
            }
        }
    }
}
