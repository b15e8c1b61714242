//! Round-driven coordinator.

use std::sync::Arc;

use bindery_core::{MemoryEmitter, SharedEmitter};
use bindery_manifest::{BuildInfoLoader, BuildMetadata};
use bindery_model::{RoundEnv, markers};
use eyre::{Result, WrapErr, bail};
use tracing::{debug, info, warn};

use super::{Diagnostic, Plugin, ProcessReport, Step, StepContext, StepState};
use crate::steps;

type StepFactory = Box<dyn FnOnce() -> Vec<Box<dyn Step>> + Send>;
type EmitterFactory = Box<dyn FnOnce() -> Result<SharedEmitter> + Send>;

/// Construction state of the step list and the shared emitter.
enum Lifecycle {
    /// Nothing built yet; holds the factories.
    Uninitialized {
        steps: StepFactory,
        emitter: EmitterFactory,
    },
    /// Left behind when a factory fails; every later call errors.
    Poisoned,
    Ready(Ready),
}

struct Ready {
    steps: Vec<StepState>,
    emitter: SharedEmitter,
}

impl Lifecycle {
    /// Build the step list and emitter on first use, exactly once.
    fn ready(&mut self) -> Result<&mut Ready> {
        if let Lifecycle::Uninitialized { .. } = self {
            match std::mem::replace(self, Lifecycle::Poisoned) {
                Lifecycle::Uninitialized { steps, emitter } => {
                    let emitter = emitter().wrap_err("failed to create emitter")?;
                    let steps: Vec<StepState> = steps().into_iter().map(StepState::new).collect();
                    info!(
                        steps = ?steps.iter().map(StepState::name).collect::<Vec<_>>(),
                        "initialized generation steps"
                    );
                    *self = Lifecycle::Ready(Ready { steps, emitter });
                }
                other => *self = other,
            }
        }

        match self {
            Lifecycle::Ready(ready) => Ok(ready),
            _ => bail!("coordinator failed to initialize in an earlier round"),
        }
    }
}

/// Coordinates the generation steps across compilation rounds.
///
/// The host calls [`on_round`](Self::on_round) once per round and
/// [`on_last_round`](Self::on_last_round) once after the final round. Steps
/// and the shared emitter are built lazily on the first round.
///
/// # Example
///
/// ```ignore
/// let mut coordinator = Coordinator::new(MarkerLoader::new())
///     .emitter(|| Ok(Arc::new(FileEmitter::new("build/generated")) as SharedEmitter));
///
/// for round in &rounds {
///     coordinator.on_round(round)?;
/// }
/// let report = coordinator.on_last_round(rounds.last().unwrap())?;
/// ```
pub struct Coordinator {
    loader: Box<dyn BuildInfoLoader>,
    lifecycle: Lifecycle,
    plugins: Vec<Box<dyn Plugin>>,
    diagnostics: Vec<Diagnostic>,
    rounds: usize,
    processed: usize,
    /// Record seen in the latest processed round.
    last_metadata: Option<BuildMetadata>,
}

impl Coordinator {
    /// Create a coordinator with the built-in steps and an in-memory emitter.
    pub fn new(loader: impl BuildInfoLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            lifecycle: Lifecycle::Uninitialized {
                steps: Box::new(steps::builtin),
                emitter: Box::new(|| -> Result<SharedEmitter> {
                    Ok(Arc::new(MemoryEmitter::new()))
                }),
            },
            plugins: Vec::new(),
            diagnostics: Vec::new(),
            rounds: 0,
            processed: 0,
            last_metadata: None,
        }
    }

    /// Replace the factory that builds the ordered step list.
    ///
    /// Has no effect once the coordinator has initialized.
    pub fn steps(mut self, factory: impl FnOnce() -> Vec<Box<dyn Step>> + Send + 'static) -> Self {
        if let Lifecycle::Uninitialized { steps, .. } = &mut self.lifecycle {
            *steps = Box::new(factory);
        }
        self
    }

    /// Replace the factory that builds the shared emitter.
    ///
    /// Has no effect once the coordinator has initialized.
    pub fn emitter(
        mut self,
        factory: impl FnOnce() -> Result<SharedEmitter> + Send + 'static,
    ) -> Self {
        if let Lifecycle::Uninitialized { emitter, .. } = &mut self.lifecycle {
            *emitter = Box::new(factory);
        }
        self
    }

    /// Add a plugin to receive step lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Markers the coordinator processes.
    pub fn supported_markers() -> &'static [&'static str] {
        markers::SUPPORTED_MARKERS
    }

    /// Minimum source-language version the coordinator supports.
    pub fn min_source_version() -> u32 {
        markers::MIN_SOURCE_VERSION
    }

    /// Whether the step list and emitter have been built.
    pub fn is_initialized(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready(_))
    }

    /// The shared emitter, once initialized.
    pub fn emitter_handle(&self) -> Option<&SharedEmitter> {
        match &self.lifecycle {
            Lifecycle::Ready(ready) => Some(&ready.emitter),
            _ => None,
        }
    }

    /// Progress of every step, in step order. Empty before initialization.
    pub fn step_summaries(&self) -> Vec<super::StepSummary> {
        match &self.lifecycle {
            Lifecycle::Ready(ready) => ready.steps.iter().map(StepState::summary).collect(),
            _ => Vec::new(),
        }
    }

    /// Diagnostics reported by steps so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Process one round.
    ///
    /// Returns `true` when every step has reported it is done. Returns
    /// `false` without running any step when build metadata isn't available
    /// yet.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails, the build metadata is
    /// malformed, or a step or plugin fails.
    pub fn on_round(&mut self, round: &dyn RoundEnv) -> Result<bool> {
        self.rounds += 1;
        let ready = self.lifecycle.ready()?;

        let Some(metadata) = load_metadata(self.loader.as_ref(), round)? else {
            debug!(round = round.number(), "build metadata not available, deferring steps");
            return Ok(false);
        };
        self.processed += 1;
        self.last_metadata = Some(metadata.clone());

        for state in ready.steps.iter_mut().filter(|s| !s.is_done()) {
            let name = state.name();
            for plugin in &self.plugins {
                plugin.on_before_step(name, round.number())?;
            }

            let mut cx = StepContext::new(name, ready.emitter.as_ref(), &mut self.diagnostics);
            let done = state
                .step_mut()
                .advance(round, &metadata, &mut cx)
                .wrap_err_with(|| format!("step '{}' failed in round {}", name, round.number()))?;
            state.record(round.number(), done);
            debug!(step = name, round = round.number(), done, "advanced step");

            for plugin in &self.plugins {
                plugin.on_after_step(name, round.number(), done)?;
            }
        }

        let all_done = ready.steps.iter().all(StepState::is_done);
        info!(round = round.number(), all_done, "round processed");
        Ok(all_done)
    }

    /// Run every step's closing action after the last round.
    ///
    /// Consumes the coordinator, so finalization happens at most once.
    /// Steps are finalized in order whether or not they finished, with
    /// `None` metadata if it never became available. A record that is no
    /// longer visible to `round` falls back to the one seen last.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization fails, the build metadata is
    /// malformed, or a step or plugin fails.
    pub fn on_last_round(mut self, round: &dyn RoundEnv) -> Result<ProcessReport> {
        let ready = self.lifecycle.ready()?;
        let metadata = match load_metadata(self.loader.as_ref(), round)? {
            Some(metadata) => Some(metadata),
            None => self.last_metadata.take(),
        };
        if self.processed == 0 && metadata.is_none() {
            warn!(
                rounds = self.rounds,
                "build metadata never became available; finalizing without it"
            );
        }

        for state in ready.steps.iter_mut() {
            let name = state.name();
            for plugin in &self.plugins {
                plugin.on_finalize(name, round.number())?;
            }

            let mut cx = StepContext::new(name, ready.emitter.as_ref(), &mut self.diagnostics);
            state
                .step_mut()
                .finalize(round, metadata.as_ref(), &mut cx)
                .wrap_err_with(|| format!("step '{}' failed to finalize", name))?;
            state.mark_finalized();
        }

        let steps: Vec<_> = ready.steps.iter().map(StepState::summary).collect();
        info!(
            rounds = self.rounds,
            processed = self.processed,
            diagnostics = self.diagnostics.len(),
            "finalized generation steps"
        );

        Ok(ProcessReport {
            rounds: self.rounds,
            processed_rounds: self.processed,
            metadata_found: metadata.is_some(),
            complete: steps.iter().all(|s| s.done),
            steps,
            diagnostics: self.diagnostics,
        })
    }

    /// Feed a full sequence of rounds, then finalize with the last one.
    ///
    /// # Errors
    ///
    /// Returns an error if `rounds` is empty or any round fails.
    pub fn drive<R: RoundEnv>(mut self, rounds: &[R]) -> Result<ProcessReport> {
        let Some(last) = rounds.last() else {
            bail!("no rounds to process");
        };
        for round in rounds {
            self.on_round(round)?;
        }
        self.on_last_round(last)
    }
}

fn load_metadata(loader: &dyn BuildInfoLoader, round: &dyn RoundEnv) -> Result<Option<BuildMetadata>> {
    loader
        .load(round)
        .map_err(|e| eyre::Report::new(*e))
        .wrap_err_with(|| format!("failed to load build metadata in round {}", round.number()))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use bindery_core::Emitter;
    use bindery_model::{Annotation, Element, ElementKind, Round, markers::BINDING_BUILD_INFO};

    use super::*;

    /// Fake loader that reports metadata present or absent per round number.
    struct ScriptedLoader {
        available_from: usize,
    }

    impl BuildInfoLoader for ScriptedLoader {
        fn load(&self, round: &dyn RoundEnv) -> bindery_manifest::Result<Option<BuildMetadata>> {
            if round.number() >= self.available_from {
                Ok(Some(BuildMetadata::new("test", "com.example")))
            } else {
                Ok(None)
            }
        }
    }

    /// Step that returns scripted results and logs every call.
    struct ScriptedStep {
        name: &'static str,
        results: Vec<bool>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Step for ScriptedStep {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "scripted"
        }

        fn advance(
            &mut self,
            round: &dyn RoundEnv,
            _metadata: &BuildMetadata,
            _cx: &mut StepContext<'_>,
        ) -> Result<bool> {
            self.log
                .lock()
                .unwrap()
                .push(format!("advance:{}:{}", self.name, round.number()));
            Ok(if self.results.is_empty() {
                false
            } else {
                self.results.remove(0)
            })
        }

        fn finalize(
            &mut self,
            _round: &dyn RoundEnv,
            metadata: Option<&BuildMetadata>,
            _cx: &mut StepContext<'_>,
        ) -> Result<()> {
            self.log.lock().unwrap().push(format!(
                "finalize:{}:{}",
                self.name,
                metadata.is_some()
            ));
            Ok(())
        }
    }

    fn scripted(
        log: &Arc<Mutex<Vec<String>>>,
        scripts: Vec<(&'static str, Vec<bool>)>,
    ) -> impl FnOnce() -> Vec<Box<dyn Step>> + Send + 'static {
        let log = log.clone();
        move || {
            scripts
                .into_iter()
                .map(|(name, results)| {
                    Box::new(ScriptedStep {
                        name,
                        results,
                        log: log.clone(),
                    }) as Box<dyn Step>
                })
                .collect()
        }
    }

    fn round(number: usize) -> Round {
        Round::new(number, Vec::new())
    }

    fn take(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        std::mem::take(&mut *log.lock().unwrap())
    }

    #[test]
    fn test_initializes_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let mut coordinator = Coordinator::new(ScriptedLoader { available_from: 1 }).steps(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        });

        assert!(!coordinator.is_initialized());
        coordinator.on_round(&round(1)).unwrap();
        let first = Arc::as_ptr(coordinator.emitter_handle().unwrap()) as *const ();
        coordinator.on_round(&round(2)).unwrap();
        coordinator.on_round(&round(3)).unwrap();
        let later = Arc::as_ptr(coordinator.emitter_handle().unwrap()) as *const ();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(first, later);
    }

    #[test]
    fn test_initializes_even_without_metadata() {
        let mut coordinator = Coordinator::new(ScriptedLoader {
            available_from: usize::MAX,
        });

        assert!(!coordinator.on_round(&round(1)).unwrap());
        assert!(coordinator.is_initialized());
    }

    #[test]
    fn test_done_steps_are_skipped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = Coordinator::new(ScriptedLoader { available_from: 1 })
            .steps(scripted(&log, vec![("a", vec![true]), ("b", vec![false, true])]));

        assert!(!coordinator.on_round(&round(1)).unwrap());
        assert_eq!(take(&log), vec!["advance:a:1", "advance:b:1"]);

        assert!(coordinator.on_round(&round(2)).unwrap());
        assert_eq!(take(&log), vec!["advance:b:2"]);

        assert!(coordinator.on_round(&round(3)).unwrap());
        assert!(take(&log).is_empty());
    }

    #[test]
    fn test_metadata_gates_steps() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = Coordinator::new(ScriptedLoader { available_from: 2 })
            .steps(scripted(&log, vec![("a", vec![true])]));

        assert!(!coordinator.on_round(&round(1)).unwrap());
        assert!(take(&log).is_empty());

        assert!(coordinator.on_round(&round(2)).unwrap());
        assert_eq!(take(&log), vec!["advance:a:2"]);
    }

    #[test]
    fn test_finalize_runs_for_every_step_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = Coordinator::new(ScriptedLoader { available_from: 1 })
            .steps(scripted(&log, vec![("a", vec![true]), ("b", vec![]), ("c", vec![true])]));

        coordinator.on_round(&round(1)).unwrap();
        take(&log);

        let report = coordinator.on_last_round(&round(1).last()).unwrap();
        assert_eq!(
            take(&log),
            vec!["finalize:a:true", "finalize:b:true", "finalize:c:true"]
        );
        assert!(!report.complete);
        assert!(report.steps.iter().all(|s| s.finalized));
        assert_eq!(report.steps[1].advanced, 1);
        assert_eq!(report.steps[0].done_in_round, Some(1));
    }

    /// Loader that only sees the record during one round.
    struct FlickeringLoader {
        round: usize,
    }

    impl BuildInfoLoader for FlickeringLoader {
        fn load(&self, round: &dyn RoundEnv) -> bindery_manifest::Result<Option<BuildMetadata>> {
            Ok((round.number() == self.round).then(|| BuildMetadata::new("test", "com.example")))
        }
    }

    #[test]
    fn test_finalize_keeps_metadata_seen_earlier() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = Coordinator::new(FlickeringLoader { round: 1 })
            .steps(scripted(&log, vec![("a", vec![false])]));

        coordinator.on_round(&round(1)).unwrap();
        coordinator.on_round(&round(2)).unwrap();
        take(&log);

        let report = coordinator.on_last_round(&round(2).last()).unwrap();
        assert_eq!(take(&log), vec!["finalize:a:true"]);
        assert!(report.metadata_found);
        assert_eq!(report.processed_rounds, 1);
    }

    #[test]
    fn test_finalize_without_any_round() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let coordinator = Coordinator::new(ScriptedLoader {
            available_from: usize::MAX,
        })
        .steps(scripted(&log, vec![("a", vec![])]));

        let report = coordinator.on_last_round(&round(1).last()).unwrap();

        assert_eq!(take(&log), vec!["finalize:a:false"]);
        assert!(!report.metadata_found);
        assert_eq!(report.rounds, 0);
    }

    #[test]
    fn test_malformed_metadata_propagates() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut coordinator = Coordinator::new(bindery_manifest::MarkerLoader::new())
            .steps(scripted(&log, vec![("a", vec![true])]));
        let bad = Round::new(
            1,
            vec![
                Element::new("com.example.Info", ElementKind::Class)
                    .annotated(Annotation::new(BINDING_BUILD_INFO).arg("build_id", "b")),
            ],
        );

        let err = coordinator.on_round(&bad).unwrap_err();

        assert!(err.downcast_ref::<bindery_manifest::Error>().is_some());
        assert!(take(&log).is_empty());
    }

    #[test]
    fn test_emitter_failure_poisons() {
        let mut coordinator = Coordinator::new(ScriptedLoader { available_from: 1 })
            .emitter(|| Err(eyre::eyre!("no output directory")));

        assert!(coordinator.on_round(&round(1)).is_err());
        let err = coordinator.on_round(&round(2)).unwrap_err();
        assert!(err.to_string().contains("failed to initialize"));
    }

    #[test]
    fn test_step_error_propagates() {
        struct Failing;

        impl Step for Failing {
            fn name(&self) -> &'static str {
                "failing"
            }

            fn description(&self) -> &'static str {
                "always fails"
            }

            fn advance(
                &mut self,
                _round: &dyn RoundEnv,
                _metadata: &BuildMetadata,
                _cx: &mut StepContext<'_>,
            ) -> Result<bool> {
                bail!("boom")
            }

            fn finalize(
                &mut self,
                _round: &dyn RoundEnv,
                _metadata: Option<&BuildMetadata>,
                _cx: &mut StepContext<'_>,
            ) -> Result<()> {
                Ok(())
            }
        }

        let mut coordinator = Coordinator::new(ScriptedLoader { available_from: 1 })
            .steps(|| vec![Box::new(Failing) as Box<dyn Step>]);

        let err = coordinator.on_round(&round(1)).unwrap_err();
        assert!(format!("{:?}", err).contains("boom"));
    }

    #[test]
    fn test_custom_emitter_is_shared() {
        let emitter = Arc::new(MemoryEmitter::new());
        let handle = emitter.clone();
        let mut coordinator = Coordinator::new(ScriptedLoader { available_from: 1 })
            .emitter(move || Ok(emitter as SharedEmitter));

        coordinator.on_round(&round(1)).unwrap();
        coordinator
            .emitter_handle()
            .unwrap()
            .write(&"a.B".parse().unwrap(), "x")
            .unwrap();

        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn test_declared_markers() {
        assert!(Coordinator::supported_markers().contains(&markers::BINDABLE));
        assert_eq!(Coordinator::min_source_version(), 7);
    }
}
