//! Generation step trait.

use bindery_manifest::BuildMetadata;
use bindery_model::RoundEnv;
use eyre::Result;

use super::StepContext;

/// Name and description of a generation step, as listed to users.
#[derive(Debug, Clone)]
pub struct StepInfo {
    /// The step name.
    pub name: &'static str,
    /// A human-readable description.
    pub description: &'static str,
}

/// An independent generation pass driven across compilation rounds.
///
/// The coordinator calls [`advance`](Step::advance) on every round that has
/// build metadata until the step reports it is done, then never again. After
/// the last round it calls [`finalize`](Step::finalize) exactly once,
/// whether or not the step ever finished.
///
/// Built-in steps:
/// - `MethodAdapterStep` - records binding adapters, renames and conversions
/// - `ExpressionStep` - generates binding classes for layouts
/// - `BindableStep` - collects bindable properties and generates `BR`
pub trait Step: Send {
    /// The name of this step (used in diagnostics and plugin hooks).
    fn name(&self) -> &'static str;

    /// A human-readable description of what this step does.
    fn description(&self) -> &'static str;

    /// Process one round.
    ///
    /// Returns `true` once the step needs no further rounds. Until then it
    /// may be called again on later rounds and must tolerate that.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails fatally, which aborts the
    /// compilation. Problems with user input should be reported as
    /// diagnostics instead.
    fn advance(
        &mut self,
        round: &dyn RoundEnv,
        metadata: &BuildMetadata,
        cx: &mut StepContext<'_>,
    ) -> Result<bool>;

    /// Run the one-time closing action after the last round.
    ///
    /// `metadata` is `None` if the build metadata never became available.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails fatally.
    fn finalize(
        &mut self,
        round: &dyn RoundEnv,
        metadata: Option<&BuildMetadata>,
        cx: &mut StepContext<'_>,
    ) -> Result<()>;

    /// Get information about this step.
    fn info(&self) -> StepInfo {
        StepInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}
