use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for bindery-manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse round file")]
    #[diagnostic(code(bindery::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("'{element}' is missing the build info marker")]
    #[diagnostic(
        code(bindery::missing_marker),
        help("annotate '{element}' with @{marker}")
    )]
    MissingMarker { element: String, marker: String },

    #[error("malformed build info on '{element}'")]
    #[diagnostic(
        code(bindery::malformed_build_info),
        help("build info needs at least `build_id` and `module_package`")
    )]
    Malformed {
        element: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid module package '{package}'")]
    #[diagnostic(
        code(bindery::invalid_package),
        help("{reason}. Use a dotted name such as 'com.example.app'.")
    )]
    InvalidPackage { package: String, reason: String },

    #[error("invalid build info field `{field}` on '{element}': {reason}")]
    #[diagnostic(code(bindery::invalid_field))]
    InvalidField {
        element: String,
        field: &'static str,
        reason: String,
    },
}

impl Error {
    /// Create a parse error from a toml error with source context
    pub fn parse(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create an invalid field error
    pub fn invalid_field(
        element: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::InvalidField {
            element: element.into(),
            field,
            reason: reason.into(),
        })
    }
}
