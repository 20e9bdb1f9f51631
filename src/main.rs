use clap::{Parser, Subcommand};

mod cmd;

/// Italian tax calculator for capital gains and investment income
#[derive(Parser, Debug)]
#[command(name = "imposta", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capital gains, capital income and tax owed for a year
    Calculate(cmd::calculate::CalculateCommand),
    /// Plain-text tax report
    Report(cmd::report::ReportCommand),
    /// Taxable events for storage
    Events(cmd::events::EventsCommand),
    /// Crypto holdings against the reporting threshold
    Threshold(cmd::threshold::ThresholdCommand),
    /// Check input data for a year
    Validate(cmd::validate::ValidateCommand),
    /// JSON Schema of input and output documents
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calculate(cmd) => cmd.exec(),
        Command::Report(cmd) => cmd.exec(),
        Command::Events(cmd) => cmd.exec(),
        Command::Threshold(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
