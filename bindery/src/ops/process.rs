//! Process operation - drive the coordinator over every round.

use std::{path::Path, sync::Arc};

use bindery_codegen::{Coordinator, processor::SnapshotPlugin};
use bindery_core::{FileEmitter, MemoryEmitter, SharedEmitter};
use bindery_manifest::MarkerLoader;
use bindery_model::Round;
use eyre::{Context, Result};
use tracing::info;

use crate::reports::{
    GenerationReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult,
};

/// File name of the step event log inside the snapshot directory.
const EVENTS_FILE: &str = "events.json";

/// Options for the process operation.
pub struct ProcessOptions<'a> {
    /// Root directory for generated sources.
    pub output_dir: &'a Path,
    /// Whether to keep generated sources in memory instead of writing them.
    pub dry_run: bool,
    /// Where to write step events, if anywhere.
    pub snapshot_dir: Option<&'a Path>,
}

/// Execute the process operation.
///
/// Every round is delivered to a fresh coordinator, which is then finalized
/// with the last round.
pub fn process(rounds: &[Round], opts: ProcessOptions) -> Result<GenerationReport> {
    let memory = Arc::new(MemoryEmitter::new());
    let disk = Arc::new(FileEmitter::new(opts.output_dir));
    let emitter: SharedEmitter = if opts.dry_run {
        memory.clone()
    } else {
        disk.clone()
    };

    let snapshots = opts.snapshot_dir.map(|_| SnapshotPlugin::new());
    let mut coordinator = Coordinator::new(MarkerLoader::new()).emitter(move || Ok(emitter));
    if let Some(plugin) = &snapshots {
        coordinator = coordinator.plugin(plugin.clone());
    }

    let run = coordinator.drive(rounds)?;

    let snapshot_path = match (&snapshots, opts.snapshot_dir) {
        (Some(plugin), Some(dir)) => {
            let path = dir.join(EVENTS_FILE);
            plugin
                .write_json(&path)
                .wrap_err("Failed to write step events")?;
            Some(path)
        }
        _ => None,
    };

    let result = if opts.dry_run {
        GenerationResult::Preview(PreviewResult {
            files: memory
                .units()
                .into_iter()
                .map(|(name, content)| PreviewFile {
                    name: name.to_string(),
                    content,
                })
                .collect(),
        })
    } else {
        GenerationResult::Written(WrittenResult {
            output_dir: opts.output_dir.to_path_buf(),
            files: disk.written(),
            snapshot_path,
        })
    };

    info!(rounds = run.rounds, complete = run.complete, "processing finished");
    Ok(GenerationReport { run, result })
}
