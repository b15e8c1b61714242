//! Step event recording for debugging.
//!
//! This module provides a plugin that records every step invocation, so a
//! compilation's round-by-round behavior can be inspected afterwards.

use std::{
    fs,
    path::Path,
    sync::{Arc, RwLock},
};

use eyre::{Result, eyre};
use serde::Serialize;

use super::Plugin;

/// What happened to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StepEventKind {
    /// `advance` ran and returned `done`.
    Advanced { done: bool },
    /// `finalize` is about to run.
    Finalized,
}

/// A single recorded step invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepEvent {
    pub round: usize,
    pub step: String,
    #[serde(flatten)]
    pub kind: StepEventKind,
}

/// A plugin that records step invocations.
///
/// Clones share the same event log, so keep a clone to read the events after
/// handing the plugin to a coordinator.
///
/// # Example
///
/// ```ignore
/// let snapshots = SnapshotPlugin::new();
/// let coordinator = Coordinator::new(MarkerLoader::new()).plugin(snapshots.clone());
/// let report = coordinator.drive(&rounds)?;
///
/// snapshots.write_json("build/bindery/events.json")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotPlugin {
    events: Arc<RwLock<Vec<StepEvent>>>,
}

impl SnapshotPlugin {
    /// Create a new snapshot plugin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events.
    pub fn events(&self) -> Vec<StepEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Write all recorded events as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.events())?;
        fs::write(path, json)?;
        Ok(())
    }

    fn record(&self, round: usize, step: &str, kind: StepEventKind) -> Result<()> {
        self.events
            .write()
            .map_err(|_| eyre!("snapshot event log lock poisoned"))?
            .push(StepEvent {
                round,
                step: step.to_string(),
                kind,
            });
        Ok(())
    }
}

impl Plugin for SnapshotPlugin {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn on_after_step(&self, step: &str, round: usize, done: bool) -> Result<()> {
        self.record(round, step, StepEventKind::Advanced { done })
    }

    fn on_finalize(&self, step: &str, round: usize) -> Result<()> {
        self.record(round, step, StepEventKind::Finalized)
    }
}
