pub mod calculate;
pub mod events;
pub mod report;
pub mod schema;
pub mod threshold;
pub mod validate;

use clap::{Args, ValueEnum};
use imposta::{read_input_json, EngineOptions, SellPolicy, TaxEngine, TaxInput};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Arguments shared by every command that reads an input document
#[derive(Args, Debug)]
pub struct InputArgs {
    /// JSON file with holdings, transactions and cash flows ("-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Only include these portfolios (repeatable, default: all)
    #[arg(short, long = "portfolio")]
    portfolios: Vec<String>,
}

impl InputArgs {
    pub fn load(&self) -> anyhow::Result<TaxInput> {
        let input = read_input(&self.input)?;
        Ok(input.scoped_to(&self.portfolios))
    }
}

/// How sales outside the tax year treat the FIFO queue
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum FifoMode {
    /// Every sale consumes purchase lots
    #[default]
    ConsumeAll,
    /// Only sales in the tax year consume lots (legacy behaviour)
    TargetYearOnly,
}

impl From<FifoMode> for SellPolicy {
    fn from(mode: FifoMode) -> Self {
        match mode {
            FifoMode::ConsumeAll => SellPolicy::ConsumeAll,
            FifoMode::TargetYearOnly => SellPolicy::TargetYearOnly,
        }
    }
}

/// Arguments for commands that run a yearly calculation
#[derive(Args, Debug)]
pub struct YearArgs {
    /// Tax year (calendar year, e.g. 2024)
    #[arg(short, long)]
    year: i32,

    /// FIFO treatment of sales outside the tax year
    #[arg(long, value_enum, default_value_t = FifoMode::ConsumeAll)]
    fifo_mode: FifoMode,
}

impl YearArgs {
    pub fn engine(&self) -> TaxEngine {
        TaxEngine::new(EngineOptions {
            sell_policy: self.fifo_mode.into(),
        })
    }
}

/// Read the input document from a file, or stdin with "-"
pub fn read_input(path: &Path) -> anyhow::Result<TaxInput> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path)?;
        read_input_json(BufReader::new(file))
    }
}

fn read_from_stdin() -> anyhow::Result<TaxInput> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    read_input_json(io::Cursor::new(buffer))
}
