//! Coordinator plugin trait for extensibility.

use eyre::Result;

/// A plugin that can observe step invocations.
///
/// Plugins receive callbacks around every `advance` call and before every
/// `finalize` call, in step order.
///
/// # Example
///
/// ```ignore
/// struct TimingPlugin {
///     started: Mutex<Option<Instant>>,
/// }
///
/// impl Plugin for TimingPlugin {
///     fn name(&self) -> &'static str { "timing" }
///
///     fn on_before_step(&self, _step: &str, _round: usize) -> Result<()> {
///         *self.started.lock().unwrap() = Some(Instant::now());
///         Ok(())
///     }
///
///     fn on_after_step(&self, step: &str, round: usize, _done: bool) -> Result<()> {
///         if let Some(start) = *self.started.lock().unwrap() {
///             println!("{} (round {}) took {:?}", step, round, start.elapsed());
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// The name of this plugin (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Called before a step's `advance` runs.
    ///
    /// # Errors
    ///
    /// Return an error to abort the compilation.
    #[allow(unused_variables)]
    fn on_before_step(&self, step: &str, round: usize) -> Result<()> {
        Ok(())
    }

    /// Called after a step's `advance` returns.
    ///
    /// # Errors
    ///
    /// Return an error to abort the compilation.
    #[allow(unused_variables)]
    fn on_after_step(&self, step: &str, round: usize, done: bool) -> Result<()> {
        Ok(())
    }

    /// Called before a step's `finalize` runs.
    ///
    /// # Errors
    ///
    /// Return an error to abort the compilation.
    #[allow(unused_variables)]
    fn on_finalize(&self, step: &str, round: usize) -> Result<()> {
        Ok(())
    }
}
