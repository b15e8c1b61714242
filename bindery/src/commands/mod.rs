mod check;
mod completions;
mod markers;
mod process;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use markers::MarkersCommand;
use process::ProcessCommand;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for bindery_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with(*e),
        }
    }
}

/// Render manifest errors carried inside an `eyre` report the same way.
pub(crate) trait ExitOnManifestError<T> {
    fn exit_on_manifest_error(self) -> Result<T>;
}

impl<T> ExitOnManifestError<T> for Result<T> {
    fn exit_on_manifest_error(self) -> Result<T> {
        self.or_else(|report| match report.downcast::<bindery_manifest::Error>() {
            Ok(e) => exit_with(e),
            Err(report) => Err(report),
        })
    }
}

fn exit_with(e: bindery_manifest::Error) -> ! {
    eprintln!("{:?}", miette::Report::new(e));
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "bindery")]
#[command(version)]
#[command(about = "Run data binding generation steps over compilation rounds")]
pub(crate) struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Process(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Markers(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Process round files and generate sources
    Process(ProcessCommand),

    /// Check that build metadata is present and well-formed
    Check(CheckCommand),

    /// List the markers the coordinator processes
    Markers(MarkersCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
