//! Schema command - print the expected input and produced result formats

use clap::Args;
use imposta::{TaxCalculationResult, TaxEvent, TaxInput};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Which document to describe
    #[arg(value_enum, default_value = "input")]
    document: SchemaDocument,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaDocument {
    /// Holdings, transactions and cash flows read by every command
    Input,
    /// Result of the calculate command with --json
    Result,
    /// Records produced by the events command with --json
    Events,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = match self.document {
            SchemaDocument::Input => schema_for!(TaxInput),
            SchemaDocument::Result => schema_for!(TaxCalculationResult),
            SchemaDocument::Events => schema_for!(Vec<TaxEvent>),
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
