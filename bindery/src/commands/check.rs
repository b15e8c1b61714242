use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Round files in delivery order
    #[arg(required = true)]
    pub rounds: Vec<PathBuf>,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let rounds = ops::load_rounds(&self.rounds).unwrap_or_exit();
        let report = ops::check(&rounds).unwrap_or_exit();

        report.render(&mut TerminalOutput::new());
        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
