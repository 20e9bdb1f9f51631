//! Threshold command - current crypto exposure against the reporting threshold

use super::InputArgs;
use clap::Args;
use imposta::text_report::format_amount;

#[derive(Args, Debug)]
pub struct ThresholdCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl ThresholdCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.input.load()?;
        let threshold = input.check_crypto_threshold()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&threshold)?);
            return Ok(());
        }

        println!();
        println!("CRYPTO THRESHOLD");
        println!("  Current value: \u{20AC}{}", format_amount(threshold.total_value));
        println!("  Threshold: \u{20AC}{}", format_amount(threshold.threshold));
        if threshold.exceeded {
            println!("  \u{26A0} Threshold exceeded");
        } else {
            println!("  \u{2713} Below threshold");
        }
        println!();
        Ok(())
    }
}
