//! Process command report data structures.

use std::path::PathBuf;

use bindery_codegen::{ProcessReport, Severity};

use super::output::{Output, Report};

/// Report data from processing a session of rounds.
#[derive(Debug)]
pub struct GenerationReport {
    /// What the coordinator did.
    pub run: ProcessReport,
    /// Generated sources (written or preview).
    pub result: GenerationResult,
}

impl GenerationReport {
    pub fn has_errors(&self) -> bool {
        self.run.has_errors()
    }
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// Output directory.
    pub output_dir: PathBuf,
    /// Files written, in emission order.
    pub files: Vec<PathBuf>,
    /// Path to the step event log, if snapshots were enabled.
    pub snapshot_path: Option<PathBuf>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Units that would be generated.
    pub files: Vec<PreviewFile>,
}

/// A generated unit in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    /// Qualified name of the unit.
    pub name: String,
    /// Unit content.
    pub content: String,
}

impl Report for GenerationReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl GenerationReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        if let Some(path) = &written.snapshot_path {
            out.key_value("Step events written to", &path.display().to_string());
            out.newline();
        }

        self.render_run(out);

        out.key_value("Generated", &written.output_dir.display().to_string());
        for file in &written.files {
            let shown = file.strip_prefix(&written.output_dir).unwrap_or(file);
            out.added_item(&shown.display().to_string());
        }
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for file in &preview.files {
            out.divider(&file.name);
            out.preformatted(&file.content);
        }

        self.render_run(out);

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", preview.files.len()));
    }

    fn render_run(&self, out: &mut dyn Output) {
        for diag in &self.run.diagnostics {
            match diag.severity {
                Severity::Info => out.preformatted(&diag.to_string()),
                _ => out.warning(&format!("[{}] {}", diag.step, diag)),
            }
        }
        if !self.run.diagnostics.is_empty() {
            out.newline();
        }

        if !self.run.metadata_found {
            out.warning("warning: build metadata was never found; no step ran");
        }

        out.section(&format!(
            "Steps ({} of {} rounds processed)",
            self.run.processed_rounds, self.run.rounds
        ));
        for step in &self.run.steps {
            let status = match step.done_in_round {
                Some(round) => format!("done in round {}", round),
                None => "pending at finalization".to_string(),
            };
            out.list_item(&format!("{}: {}, advanced {}x", step.name, status, step.advanced));
        }
        out.newline();
    }
}
