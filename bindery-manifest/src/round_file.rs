//! Round files: one round's elements, as written by a file-driven host.
//!
//! ```toml
//! [[elements]]
//! name = "com.example.User"
//! kind = "class"
//!
//! [[elements.annotation]]
//! name = "bindery.Bindable"
//! ```

use std::path::Path;

use bindery_model::Element;
use serde::Deserialize;

use crate::{Error, Result};

/// The elements introduced by one round.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoundFile {
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// Parse a round file from the given path
pub fn parse_file(path: impl AsRef<Path>) -> Result<RoundFile> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    let filename = path.display().to_string();
    parse_str_with_filename(&content, &filename)
}

/// Parse a round file from a string (uses "round.toml" as default filename)
pub fn parse_str(content: &str) -> Result<RoundFile> {
    parse_str_with_filename(content, "round.toml")
}

/// Parse a round file from a string with a custom filename for error reporting
pub fn parse_str_with_filename(content: &str, filename: &str) -> Result<RoundFile> {
    toml::from_str(content).map_err(|e| Error::parse(e, content, filename))
}
