use super::cash_flow::CashFlow;
use super::fifo::{match_gains, CapitalGainRecord, SellPolicy};
use super::holding::Holding;
use super::income::{aggregate_income, IncomeReport};
use super::italy::{self, TaxYear};
use super::threshold::{check_crypto_threshold, current_values, CryptoThreshold};
use super::transaction::Transaction;
use super::validation::{checked_sum, validate_inputs, ValidationError};
use super::warnings::Warning;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tax owed split by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxBreakdown {
    #[schemars(with = "f64")]
    pub capital_gains_tax: Decimal,
    #[schemars(with = "f64")]
    pub dividend_tax: Decimal,
    #[schemars(with = "f64")]
    pub interest_tax: Decimal,
}

/// Taxable income and tax owed for one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxCalculationResult {
    pub tax_year: TaxYear,
    pub capital_gains: Vec<CapitalGainRecord>,
    /// Signed: a net-loss year is negative
    #[schemars(with = "f64")]
    pub total_capital_gains: Decimal,
    #[schemars(with = "f64")]
    pub dividend_income: Decimal,
    #[schemars(with = "f64")]
    pub interest_income: Decimal,
    #[schemars(with = "f64")]
    pub total_taxable_income: Decimal,
    #[schemars(with = "f64")]
    pub total_tax_owed: Decimal,
    pub breakdown: TaxBreakdown,
    pub crypto_threshold: CryptoThreshold,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl TaxCalculationResult {
    pub fn gain_count(&self) -> usize {
        self.capital_gains.len()
    }

    pub fn loss_count(&self) -> usize {
        self.capital_gains.iter().filter(|g| g.is_loss()).count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub sell_policy: SellPolicy,
}

/// Stateless calculator. Every call builds its own lot queues, so one engine
/// can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxEngine {
    options: EngineOptions,
}

/// Everything one year's calculation derives from the inputs
pub(crate) struct Calculation {
    pub result: TaxCalculationResult,
    pub income: IncomeReport,
}

impl TaxEngine {
    pub fn new(options: EngineOptions) -> Self {
        TaxEngine { options }
    }

    /// Compute capital gains, capital income and tax owed for `tax_year`
    pub fn calculate_taxes(
        &self,
        transactions: &[Transaction],
        holdings: &[Holding],
        cash_flows: &[CashFlow],
        tax_year: i32,
    ) -> Result<TaxCalculationResult, ValidationError> {
        self.calculate(transactions, holdings, cash_flows, tax_year)
            .map(|c| c.result)
    }

    pub(crate) fn calculate(
        &self,
        transactions: &[Transaction],
        holdings: &[Holding],
        cash_flows: &[CashFlow],
        tax_year: i32,
    ) -> Result<Calculation, ValidationError> {
        let tax_year = validate_inputs(transactions, tax_year)?;

        let gains = match_gains(transactions, holdings, tax_year, self.options.sell_policy)?;
        let income = aggregate_income(cash_flows, tax_year);
        let crypto_threshold = check_crypto_threshold(holdings, &current_values(holdings))?;

        let total_capital_gains =
            checked_sum(gains.gains.iter().map(|g| g.gain), "capital gains")?;
        let capital_gains_tax =
            checked_sum(gains.gains.iter().map(|g| g.tax_owed), "capital gains tax")?;

        let dividend_income = income.dividend_income()?;
        let dividend_tax = apply_rate(dividend_income, italy::DIVIDENDS, "dividend tax")?;

        let interest_income = income.interest_income()?;
        let interest_tax = apply_rate(interest_income, italy::INTEREST, "interest tax")?;

        let total_taxable_income = checked_sum(
            [total_capital_gains, dividend_income, interest_income],
            "taxable income",
        )?;
        let total_tax_owed = checked_sum(
            [capital_gains_tax, dividend_tax, interest_tax],
            "tax owed",
        )?;

        log::debug!(
            "Tax year {}: {} gain record(s), gains={}, dividends={}, interest={}",
            tax_year,
            gains.gains.len(),
            total_capital_gains,
            dividend_income,
            interest_income
        );

        let result = TaxCalculationResult {
            tax_year,
            capital_gains: gains.gains,
            total_capital_gains,
            dividend_income,
            interest_income,
            total_taxable_income,
            total_tax_owed,
            breakdown: TaxBreakdown {
                capital_gains_tax,
                dividend_tax,
                interest_tax,
            },
            crypto_threshold,
            warnings: gains.warnings,
        };

        Ok(Calculation { result, income })
    }
}

fn apply_rate(amount: Decimal, rate: Decimal, id: &str) -> Result<Decimal, ValidationError> {
    amount
        .checked_mul(rate)
        .ok_or_else(|| ValidationError::overflow(id))
}

/// [`TaxEngine::calculate_taxes`] with default options
pub fn calculate_taxes(
    transactions: &[Transaction],
    holdings: &[Holding],
    cash_flows: &[CashFlow],
    tax_year: i32,
) -> Result<TaxCalculationResult, ValidationError> {
    TaxEngine::default().calculate_taxes(transactions, holdings, cash_flows, tax_year)
}
