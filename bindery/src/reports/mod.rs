//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod check;
mod markers;
mod output;
mod process;

pub use check::CheckReport;
pub use markers::MarkersReport;
pub use output::{Report, TerminalOutput};
pub use process::{GenerationReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};
