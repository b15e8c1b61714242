use clap::Args;
use eyre::Result;

use crate::reports::{MarkersReport, Report, TerminalOutput};

#[derive(Args)]
pub struct MarkersCommand {}

impl MarkersCommand {
    pub fn run(&self) -> Result<()> {
        MarkersReport::current().render(&mut TerminalOutput::new());
        Ok(())
    }
}
