//! Diagnostic types reported by generation steps.
//!
//! Steps report user-facing problems here instead of failing, so a single
//! bad annotation doesn't abort the whole compilation.

use serde::Serialize;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A problem the user must fix; output for the element was skipped.
    Error,
    /// A problem that doesn't prevent generation but should be addressed.
    Warning,
    /// Informational message about the generation process.
    Info,
}

impl Severity {
    /// Returns true if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns true if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message from a generation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The step that produced this diagnostic.
    pub step: String,
    /// The diagnostic message.
    pub message: String,
    /// Optional element the diagnostic refers to (e.g., "com.example.User.getName").
    pub element: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, step, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, step, message)
    }

    /// Create a new info diagnostic.
    pub fn info(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, step, message)
    }

    fn new(severity: Severity, step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            step: step.into(),
            message: message.into(),
            element: None,
        }
    }

    /// Attach the element this diagnostic refers to.
    pub fn at(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(element) = &self.element {
            write!(f, " (at {})", element)?;
        }
        Ok(())
    }
}
