use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

/// A dotted, fully-qualified name of a generated unit (e.g. `com.example.BR`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct QualifiedName {
    full: String,
}

impl QualifiedName {
    /// Build a name from a package and a simple name.
    ///
    /// An empty package yields a name in the default package.
    pub fn in_package(package: &str, simple: &str) -> Result<Self, String> {
        if package.is_empty() {
            simple.parse()
        } else {
            format!("{}.{}", package, simple).parse()
        }
    }

    /// The package part, or `None` for the default package.
    pub fn package(&self) -> Option<&str> {
        self.full.rsplit_once('.').map(|(pkg, _)| pkg)
    }

    /// The last segment of the name.
    pub fn simple_name(&self) -> &str {
        self.full
            .rsplit_once('.')
            .map_or(self.full.as_str(), |(_, simple)| simple)
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// Relative source path for this unit, e.g. `com/example/BR.java`.
    pub fn to_path(&self, extension: &str) -> PathBuf {
        let mut path: PathBuf = self.full.split('.').collect();
        path.set_extension(extension);
        path
    }
}

/// Returns a reason when `segment` is not a valid identifier.
fn check_segment(segment: &str) -> Option<&'static str> {
    let mut chars = segment.chars();
    match chars.next() {
        None => Some("empty segment"),
        Some(c) if !(c.is_alphabetic() || c == '_' || c == '$') => {
            Some("segment must start with a letter, '_' or '$'")
        }
        Some(_) => {
            if chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
                None
            } else {
                Some("segment contains invalid characters")
            }
        }
    }
}

impl FromStr for QualifiedName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for segment in s.split('.') {
            if let Some(reason) = check_segment(segment) {
                return Err(format!("invalid qualified name '{}': {}", s, reason));
            }
        }
        Ok(Self {
            full: s.to_string(),
        })
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full)
    }
}
