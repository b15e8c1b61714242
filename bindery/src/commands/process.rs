use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::{ExitOnManifestError, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ProcessCommand {
    /// Round files in delivery order; the last one is the final round
    #[arg(required = true)]
    pub rounds: Vec<PathBuf>,

    /// Output directory for generated sources
    #[arg(short, long, default_value = "build/generated/bindery")]
    pub output: PathBuf,

    /// Preview generated sources without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Write step events as JSON to this directory
    #[arg(long, value_name = "DIR")]
    pub snapshots: Option<PathBuf>,
}

impl ProcessCommand {
    pub fn run(&self) -> Result<()> {
        let rounds = ops::load_rounds(&self.rounds).unwrap_or_exit();

        let report = ops::process(
            &rounds,
            ops::process::ProcessOptions {
                output_dir: &self.output,
                dry_run: self.dry_run,
                snapshot_dir: self.snapshots.as_deref(),
            },
        )
        .exit_on_manifest_error()?;

        report.render(&mut TerminalOutput::new());
        if report.has_errors() {
            std::process::exit(1);
        }
        Ok(())
    }
}
