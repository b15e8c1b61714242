//! Outcome of a full compilation.

use serde::Serialize;

use super::{Diagnostic, StepSummary};

/// Summary returned by [`Coordinator::on_last_round`](super::Coordinator::on_last_round).
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    /// Rounds delivered by the host.
    pub rounds: usize,
    /// Rounds in which build metadata was available and steps ran.
    pub processed_rounds: usize,
    /// Whether build metadata was available at finalization.
    pub metadata_found: bool,
    /// Whether every step reported it was done.
    pub complete: bool,
    /// Per-step progress, in step order.
    pub steps: Vec<StepSummary>,
    /// Diagnostics reported by steps.
    pub diagnostics: Vec<Diagnostic>,
}

impl ProcessReport {
    /// Check if any error diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Count the number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }

    /// Count the number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_warning())
            .count()
    }
}
