//! Per-step completion tracking.

use serde::Serialize;

use super::Step;

/// A step together with its completion record.
///
/// Once `done` is set it stays set, and the coordinator never hands the
/// step another round.
pub struct StepState {
    step: Box<dyn Step>,
    done: bool,
    advanced: usize,
    done_in_round: Option<usize>,
    finalized: bool,
}

impl StepState {
    pub fn new(step: Box<dyn Step>) -> Self {
        Self {
            step,
            done: false,
            advanced: 0,
            done_in_round: None,
            finalized: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.step.name()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn step_mut(&mut self) -> &mut dyn Step {
        self.step.as_mut()
    }

    /// Record the outcome of one `advance` call made in `round`.
    pub(crate) fn record(&mut self, round: usize, done: bool) {
        self.advanced += 1;
        if done && !self.done {
            self.done = true;
            self.done_in_round = Some(round);
        }
    }

    pub(crate) fn mark_finalized(&mut self) {
        self.finalized = true;
    }

    pub fn summary(&self) -> StepSummary {
        StepSummary {
            name: self.name().to_string(),
            done: self.done,
            advanced: self.advanced,
            done_in_round: self.done_in_round,
            finalized: self.finalized,
        }
    }
}

impl std::fmt::Debug for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepState")
            .field("step", &self.name())
            .field("done", &self.done)
            .field("advanced", &self.advanced)
            .finish()
    }
}

/// Snapshot of a step's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    /// The step name.
    pub name: String,
    /// Whether the step reported it needs no further rounds.
    pub done: bool,
    /// How many times `advance` was called.
    pub advanced: usize,
    /// The round in which the step finished, if it did.
    pub done_in_round: Option<usize>,
    /// Whether `finalize` has run.
    pub finalized: bool,
}
