//! Per-invocation context handed to steps.

use bindery_core::{Emitter, QualifiedName, WriteResult};
use eyre::Result;

use super::diagnostic::Diagnostic;

/// Everything a step may touch besides its own state.
///
/// Output goes through the shared emitter and user-facing problems go into
/// the coordinator's diagnostics; steps have no other side channels.
pub struct StepContext<'a> {
    step: &'static str,
    emitter: &'a dyn Emitter,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(
        step: &'static str,
        emitter: &'a dyn Emitter,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            step,
            emitter,
            diagnostics,
        }
    }

    /// Write a generated unit through the shared emitter.
    pub fn emit(&self, name: &QualifiedName, content: &str) -> Result<WriteResult> {
        self.emitter.write(name, content)
    }

    /// Add an error diagnostic.
    pub fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(self.step, message));
    }

    /// Add an error diagnostic about a specific element.
    pub fn error_at(&mut self, element: impl Into<String>, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::error(self.step, message).at(element));
    }

    /// Add a warning diagnostic.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(self.step, message));
    }

    /// Add an info diagnostic.
    pub fn info(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(self.step, message));
    }
}
