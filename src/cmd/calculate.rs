//! Calculate command - capital gains, capital income and tax owed for a year

use super::{InputArgs, YearArgs};
use clap::Args;
use imposta::text_report::{format_amount, format_quantity, format_rate};
use imposta::{CapitalGainRecord, TaxCalculationResult};
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalculateCommand {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    year: YearArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Row for the capital gains table
#[derive(Debug, Clone, Tabled)]
struct GainRow {
    #[tabled(rename = "#")]
    row_num: usize,
    #[tabled(rename = "Holding")]
    holding: String,
    #[tabled(rename = "Class")]
    asset_class: String,
    #[tabled(rename = "Bought")]
    purchase_date: String,
    #[tabled(rename = "Sold")]
    sale_date: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Cost")]
    purchase_price: String,
    #[tabled(rename = "Price")]
    sale_price: String,
    #[tabled(rename = "Gain/Loss")]
    gain: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Tax")]
    tax_owed: String,
}

impl GainRow {
    fn new(row_num: usize, g: &CapitalGainRecord) -> Self {
        GainRow {
            row_num,
            holding: g.holding_name.clone(),
            asset_class: g.asset_class.display().to_string(),
            purchase_date: g.purchase_date.format("%Y-%m-%d").to_string(),
            sale_date: g.sale_date.format("%Y-%m-%d").to_string(),
            quantity: format_quantity(g.quantity),
            purchase_price: format_amount(g.purchase_price),
            sale_price: format_amount(g.sale_price),
            gain: format_eur_signed(g.gain),
            rate: format!("{}%", format_rate(g.tax_rate)),
            tax_owed: format_eur(g.tax_owed),
        }
    }
}

impl CalculateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.input.load()?;
        let result = input.calculate_taxes(&self.year.engine(), self.year.year)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_summary(&result);
        }
        Ok(())
    }
}

fn print_summary(result: &TaxCalculationResult) {
    println!();
    println!("TAX SUMMARY ({})", result.tax_year);
    println!();

    println!("CAPITAL GAINS");
    if result.capital_gains.is_empty() {
        println!("  No sales in {}", result.tax_year);
    } else {
        let rows: Vec<GainRow> = result
            .capital_gains
            .iter()
            .enumerate()
            .map(|(i, g)| GainRow::new(i + 1, g))
            .collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(5..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
    println!(
        "  Records: {} ({} at a loss) | Net gain: {} | Tax: {}",
        result.gain_count(),
        result.loss_count(),
        format_eur_signed(result.total_capital_gains),
        format_eur(result.breakdown.capital_gains_tax)
    );
    println!();

    println!("CAPITAL INCOME");
    println!(
        "  Dividends: {} (Tax: {})",
        format_eur(result.dividend_income),
        format_eur(result.breakdown.dividend_tax)
    );
    println!(
        "  Interest: {} (Tax: {})",
        format_eur(result.interest_income),
        format_eur(result.breakdown.interest_tax)
    );
    println!();

    println!(
        "TAXABLE INCOME: {}",
        format_eur_signed(result.total_taxable_income)
    );
    println!("TOTAL TAX OWED: {}", format_eur(result.total_tax_owed));
    println!();

    let threshold = &result.crypto_threshold;
    if threshold.exceeded {
        println!(
            "\u{26A0} Crypto holdings worth {} exceed the {} threshold",
            format_eur(threshold.total_value),
            format_eur(threshold.threshold)
        );
        println!();
    }

    if !result.warnings.is_empty() {
        println!(
            "\u{26A0} {} data issue(s) found, run `validate` for details",
            result.warnings.len()
        );
        println!();
    }
}

fn format_eur(amount: Decimal) -> String {
    format!("\u{20AC}{}", format_amount(amount))
}

fn format_eur_signed(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-\u{20AC}{}", format_amount(amount.abs()))
    } else {
        format_eur(amount)
    }
}
