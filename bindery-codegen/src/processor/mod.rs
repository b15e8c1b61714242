//! Multi-round coordination of generation steps.
//!
//! The host compiler delivers rounds one at a time. The [`Coordinator`]
//! fans each round out to an ordered list of [`Step`]s, tracks which steps
//! are done, and runs every step's closing action exactly once after the
//! last round:
//!
//! - Lazy one-time construction of the steps and the shared emitter
//! - Metadata gating (no step runs until build metadata is visible)
//! - Per-step completion flags owned by the coordinator ([`StepState`])
//! - Plugin hooks around each invocation
//! - Unified diagnostics collection
//!
//! # Example
//!
//! ```ignore
//! use bindery_codegen::processor::Coordinator;
//! use bindery_manifest::MarkerLoader;
//!
//! let mut coordinator = Coordinator::new(MarkerLoader::new());
//! for round in &rounds {
//!     coordinator.on_round(round)?;
//! }
//! let report = coordinator.on_last_round(rounds.last().unwrap())?;
//!
//! for diag in &report.diagnostics {
//!     eprintln!("{}", diag);
//! }
//! ```

mod context;
mod coordinator;
mod diagnostic;
mod plugin;
mod report;
mod shared;
mod snapshot;
mod state;
mod step;

pub use context::StepContext;
pub use coordinator::Coordinator;
pub use diagnostic::{Diagnostic, Severity};
pub use plugin::Plugin;
pub use report::ProcessReport;
pub use shared::SharedCoordinator;
pub use snapshot::{SnapshotPlugin, StepEvent, StepEventKind};
pub use state::{StepState, StepSummary};
pub use step::{Step, StepInfo};
