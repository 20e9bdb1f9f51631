//! Plain-text tax report for export.
//!
//! All rounding happens here, at the presentation boundary: amounts are
//! shown with two decimals and rates as percentages with one decimal.

use super::calculation::{TaxCalculationResult, TaxEngine};
use super::cash_flow::CashFlow;
use super::holding::Holding;
use super::transaction::Transaction;
use super::validation::ValidationError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const CURRENCY: &str = "EUR";
const RULE_WIDTH: usize = 50;

/// Label of the grand-total line carrying the tax owed
pub const TOTAL_TAX_LABEL: &str = "Imposte dovute";

/// Amount rounded half away from zero to two decimals
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Rate as a percentage with one decimal, e.g. `0.125` -> `12.5`
pub fn format_rate(rate: Decimal) -> String {
    format!(
        "{:.1}",
        (rate * dec!(100)).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Quantity without trailing zeros
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

fn money(amount: Decimal) -> String {
    format!("{} {}", CURRENCY, format_amount(amount))
}

/// Render a result. Sections always appear in the same order: capital
/// gains detail, capital income, grand total.
pub fn render_report(result: &TaxCalculationResult) -> String {
    let mut lines = vec![
        format!("DICHIARAZIONE REDDITI {}", result.tax_year),
        "=".repeat(RULE_WIDTH),
        String::new(),
        "CAPITAL GAINS:".to_string(),
    ];

    for (idx, gain) in result.capital_gains.iter().enumerate() {
        lines.push(format!("  {}. {}", idx + 1, gain.holding_name));
        lines.push(format!(
            "     Acquisto: {} @ {}",
            gain.purchase_date.format("%Y-%m-%d"),
            money(gain.purchase_price)
        ));
        lines.push(format!(
            "     Vendita: {} @ {}",
            gain.sale_date.format("%Y-%m-%d"),
            money(gain.sale_price)
        ));
        lines.push(format!("     Quantità: {}", format_quantity(gain.quantity)));
        lines.push(format!("     Guadagno: {}", money(gain.gain)));
        lines.push(format!(
            "     Imposta ({}%): {}",
            format_rate(gain.tax_rate),
            money(gain.tax_owed)
        ));
        lines.push(String::new());
    }

    lines.extend([
        String::new(),
        "REDDITI DA CAPITALE:".to_string(),
        format!("  Dividendi: {}", money(result.dividend_income)),
        format!("  Imposta dividendi: {}", money(result.breakdown.dividend_tax)),
        format!("  Interessi: {}", money(result.interest_income)),
        format!("  Imposta interessi: {}", money(result.breakdown.interest_tax)),
        String::new(),
        String::new(),
        "TOTALE:".to_string(),
        format!("  Reddito imponibile: {}", money(result.total_taxable_income)),
        format!("  {}: {}", TOTAL_TAX_LABEL, money(result.total_tax_owed)),
    ]);

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// Read the tax owed back from a rendered report
pub fn parse_total_tax(report: &str) -> Option<Decimal> {
    let prefix = format!("{}: {} ", TOTAL_TAX_LABEL, CURRENCY);
    report
        .lines()
        .find_map(|line| line.trim().strip_prefix(prefix.as_str()))
        .and_then(|amount| amount.trim().parse().ok())
}

impl TaxEngine {
    /// Calculate a year and render it as text
    pub fn generate_tax_report(
        &self,
        transactions: &[Transaction],
        holdings: &[Holding],
        cash_flows: &[CashFlow],
        tax_year: i32,
    ) -> Result<String, ValidationError> {
        let result = self.calculate_taxes(transactions, holdings, cash_flows, tax_year)?;
        Ok(render_report(&result))
    }
}

/// [`TaxEngine::generate_tax_report`] with default options
pub fn generate_tax_report(
    transactions: &[Transaction],
    holdings: &[Holding],
    cash_flows: &[CashFlow],
    tax_year: i32,
) -> Result<String, ValidationError> {
    TaxEngine::default().generate_tax_report(transactions, holdings, cash_flows, tax_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cash_flow::FlowKind;
    use crate::core::holding::{AssetClass, Metadata};
    use crate::core::transaction::{parse_timestamp, TransactionKind};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn btp() -> Holding {
        Holding {
            id: "btp".to_string(),
            name: "BTP Italia 2028".to_string(),
            asset_class: AssetClass::Bond,
            portfolio_id: None,
            metadata: Metadata {
                country: Some("IT".to_string()),
                ..Default::default()
            },
            position: None,
        }
    }

    fn trade(id: &str, kind: TransactionKind, d: &str, qty: Decimal, price: Decimal) -> Transaction {
        Transaction {
            id: id.to_string(),
            holding_id: "btp".to_string(),
            kind,
            quantity: qty,
            price,
            fee: Decimal::ZERO,
            timestamp: parse_timestamp(d).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn amount_formatting() {
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(dec!(12)), "12.00");
        assert_eq!(format_amount(dec!(12.345)), "12.35");
        assert_eq!(format_amount(dec!(12.344)), "12.34");
        assert_eq!(format_amount(dec!(-5.5)), "-5.50");
        assert_eq!(format_amount(dec!(-0.125)), "-0.13");
    }

    #[test]
    fn rate_formatting() {
        assert_eq!(format_rate(dec!(0.26)), "26.0");
        assert_eq!(format_rate(dec!(0.125)), "12.5");
    }

    #[test]
    fn quantity_formatting() {
        assert_eq!(format_quantity(dec!(10.000)), "10");
        assert_eq!(format_quantity(dec!(0.0500)), "0.05");
    }

    #[test]
    fn empty_report_has_all_sections() {
        let report = generate_tax_report(&[], &[], &[], 2024).unwrap();
        let expected = "\
DICHIARAZIONE REDDITI 2024
==================================================

CAPITAL GAINS:

REDDITI DA CAPITALE:
  Dividendi: EUR 0.00
  Imposta dividendi: EUR 0.00
  Interessi: EUR 0.00
  Imposta interessi: EUR 0.00


TOTALE:
  Reddito imponibile: EUR 0.00
  Imposte dovute: EUR 0.00
";
        assert_eq!(report, expected);
    }

    #[test]
    fn gain_detail_lines() {
        let txs = vec![
            trade("b1", TransactionKind::Buy, "2023-03-01", dec!(1000), dec!(0.98)),
            trade("s1", TransactionKind::Sell, "2024-09-15", dec!(1000), dec!(1.0235)),
        ];
        let report = generate_tax_report(&txs, &[btp()], &[], 2024).unwrap();

        assert!(report.contains("  1. BTP Italia 2028\n"));
        assert!(report.contains("     Acquisto: 2023-03-01 @ EUR 0.98\n"));
        assert!(report.contains("     Vendita: 2024-09-15 @ EUR 1.02\n"));
        assert!(report.contains("     Quantità: 1000\n"));
        assert!(report.contains("     Guadagno: EUR 43.50\n"));
        assert!(report.contains("     Imposta (12.5%): EUR 5.44\n"));
        assert!(report.contains("  Imposte dovute: EUR 5.44\n"));
    }

    #[test]
    fn sections_in_fixed_order() {
        let report = generate_tax_report(&[], &[], &[], 2024).unwrap();
        let gains = report.find("CAPITAL GAINS:").unwrap();
        let income = report.find("REDDITI DA CAPITALE:").unwrap();
        let total = report.find("TOTALE:").unwrap();
        assert!(gains < income && income < total);
    }

    #[test]
    fn total_tax_round_trips() {
        let txs = vec![
            trade("b1", TransactionKind::Buy, "2023-03-01", dec!(333), dec!(1.0001)),
            trade("s1", TransactionKind::Sell, "2024-09-15", dec!(333), dec!(1.1337)),
        ];
        let flows = vec![CashFlow {
            id: "c1".to_string(),
            holding_id: Some("btp".to_string()),
            portfolio_id: None,
            kind: FlowKind::Coupon,
            amount: dec!(7.77),
            date: date("2024-06-01"),
            is_forecasted: false,
            is_recurring: false,
        }];

        let result = crate::core::calculate_taxes(&txs, &[btp()], &flows, 2024).unwrap();
        let report = render_report(&result);
        let parsed = parse_total_tax(&report).unwrap();
        assert_eq!(
            parsed,
            result
                .total_tax_owed
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        );
    }

    #[test]
    fn parse_total_tax_missing_line() {
        assert_eq!(parse_total_tax("nothing here"), None);
    }
}
