//! The build metadata record.

use std::path::PathBuf;

use bindery_core::QualifiedName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default minimum platform level when the record doesn't specify one.
const DEFAULT_MIN_SDK: u32 = 14;

/// Compilation configuration shared with every step during a round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildMetadata {
    /// Identifier of the build that produced the record.
    pub build_id: String,
    /// Package generated units are placed in.
    pub module_package: String,
    /// Source roots of the module.
    pub source_roots: Vec<PathBuf>,
    /// Directory holding exported layout information, if any.
    pub layout_info_dir: Option<PathBuf>,
    /// Minimum platform level the module targets.
    pub min_sdk: u32,
    /// Whether the module is a library rather than an application.
    pub library: bool,
    /// Feature flags consumed by individual steps.
    pub features: IndexMap<String, bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuildInfo {
    build_id: String,
    module_package: String,
    #[serde(default)]
    source_roots: Vec<PathBuf>,
    #[serde(default)]
    layout_info_dir: Option<PathBuf>,
    #[serde(default = "default_min_sdk")]
    min_sdk: u32,
    #[serde(default)]
    library: bool,
    #[serde(default)]
    features: IndexMap<String, bool>,
}

fn default_min_sdk() -> u32 {
    DEFAULT_MIN_SDK
}

impl BuildMetadata {
    /// Create a record with defaults for everything but the identity fields.
    pub fn new(build_id: impl Into<String>, module_package: impl Into<String>) -> Self {
        Self {
            build_id: build_id.into(),
            module_package: module_package.into(),
            source_roots: Vec::new(),
            layout_info_dir: None,
            min_sdk: DEFAULT_MIN_SDK,
            library: false,
            features: IndexMap::new(),
        }
    }

    /// Enable or disable a feature flag.
    pub fn with_feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.features.insert(name.into(), enabled);
        self
    }

    /// Whether a feature flag is enabled. Unknown flags are disabled.
    pub fn feature(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }

    /// Name of a unit generated directly in the module package.
    pub fn qualified(&self, simple: &str) -> std::result::Result<QualifiedName, String> {
        QualifiedName::in_package(&self.module_package, simple)
    }

    /// Parse and validate a record from marker annotation arguments.
    ///
    /// `element` names the carrier element and is only used in errors.
    pub fn from_args(element: &str, args: &toml::Table) -> Result<Self> {
        let raw: RawBuildInfo = toml::Value::Table(args.clone())
            .try_into()
            .map_err(|source| {
                Box::new(Error::Malformed {
                    element: element.to_string(),
                    source,
                })
            })?;

        if raw.build_id.trim().is_empty() {
            return Err(Error::invalid_field(element, "build_id", "must not be empty"));
        }

        if let Err(reason) = raw.module_package.parse::<QualifiedName>() {
            return Err(Box::new(Error::InvalidPackage {
                package: raw.module_package,
                reason,
            }));
        }

        if raw.min_sdk == 0 {
            return Err(Error::invalid_field(element, "min_sdk", "must be at least 1"));
        }

        if let Some(index) = raw
            .source_roots
            .iter()
            .position(|root| root.as_os_str().is_empty())
        {
            return Err(Error::invalid_field(
                element,
                "source_roots",
                format!("entry {} is empty", index),
            ));
        }

        Ok(Self {
            build_id: raw.build_id,
            module_package: raw.module_package,
            source_roots: raw.source_roots,
            layout_info_dir: raw.layout_info_dir,
            min_sdk: raw.min_sdk,
            library: raw.library,
            features: raw.features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(content: &str) -> toml::Table {
        toml::from_str(content).expect("Failed to parse test args")
    }

    #[test]
    fn test_minimal_record_uses_defaults() {
        let meta = BuildMetadata::from_args(
            "bindery.BuildInfo",
            &args(
                r#"
                build_id = "b-1"
                module_package = "com.example"
                "#,
            ),
        )
        .expect("record should load");

        assert_eq!(meta, BuildMetadata::new("b-1", "com.example"));
        assert_eq!(meta.min_sdk, 14);
        assert!(!meta.library);
    }

    #[test]
    fn test_full_record() {
        let meta = BuildMetadata::from_args(
            "bindery.BuildInfo",
            &args(
                r#"
                build_id = "b-2"
                module_package = "com.example.lib"
                source_roots = ["src/main/java", "build/generated"]
                layout_info_dir = "build/layout-info"
                min_sdk = 21
                library = true
                features = { debug_logs = true, two_way = false }
                "#,
            ),
        )
        .expect("record should load");

        assert_eq!(meta.source_roots.len(), 2);
        assert_eq!(meta.min_sdk, 21);
        assert!(meta.library);
        assert!(meta.feature("debug_logs"));
        assert!(!meta.feature("two_way"));
        assert!(!meta.feature("unknown"));
        assert_eq!(meta.qualified("BR").unwrap().to_string(), "com.example.lib.BR");
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let err = BuildMetadata::from_args("bindery.BuildInfo", &args(r#"build_id = "b""#))
            .unwrap_err();
        assert!(matches!(*err, Error::Malformed { .. }));
    }

    #[test]
    fn test_unknown_field_is_malformed() {
        let err = BuildMetadata::from_args(
            "bindery.BuildInfo",
            &args(
                r#"
                build_id = "b"
                module_package = "com.example"
                sdk_root = "/opt/sdk"
                "#,
            ),
        )
        .unwrap_err();
        assert!(matches!(*err, Error::Malformed { .. }));
    }

    #[test]
    fn test_invalid_package() {
        let err = BuildMetadata::from_args(
            "bindery.BuildInfo",
            &args(
                r#"
                build_id = "b"
                module_package = "com..example"
                "#,
            ),
        )
        .unwrap_err();
        assert!(matches!(*err, Error::InvalidPackage { .. }));
    }

    #[test]
    fn test_empty_build_id() {
        let err = BuildMetadata::from_args(
            "bindery.BuildInfo",
            &args(
                r#"
                build_id = " "
                module_package = "com.example"
                "#,
            ),
        )
        .unwrap_err();
        assert!(matches!(
            *err,
            Error::InvalidField {
                field: "build_id",
                ..
            }
        ));
    }
}
