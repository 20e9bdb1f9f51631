//! Report command - plain-text tax report for download or printing

use super::{InputArgs, YearArgs};
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReportCommand {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    year: YearArgs,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.input.load()?;
        let report = input.generate_tax_report(&self.year.engine(), self.year.year)?;

        match &self.output {
            Some(path) => {
                fs::write(path, report)?;
                log::info!("Report written to {}", path.display());
            }
            None => print!("{}", report),
        }
        Ok(())
    }
}
