use super::calculation::TaxEngine;
use super::cash_flow::{CashFlow, FlowKind};
use super::holding::Holding;
use super::income::IncomeEvent;
use super::italy::{self, TaxYear};
use super::transaction::Transaction;
use super::validation::ValidationError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaxEventType {
    CapitalGain,
    Dividend,
    Interest,
}

impl TaxEventType {
    pub fn display(&self) -> &'static str {
        match self {
            TaxEventType::CapitalGain => "Capital Gain",
            TaxEventType::Dividend => "Dividend",
            TaxEventType::Interest => "Interest",
        }
    }
}

/// One taxable event, ready to be stored. The store assigns ids and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxEvent {
    pub user_id: String,
    pub tax_year: TaxYear,
    pub event_type: TaxEventType,
    #[schemars(with = "f64")]
    pub taxable_amount: Decimal,
    #[schemars(with = "f64")]
    pub tax_rate: Decimal,
    #[schemars(with = "f64")]
    pub tax_owed: Decimal,
    pub holding_id: Option<String>,
    #[schemars(with = "String")]
    pub event_date: NaiveDate,
    pub notes: String,
}

impl TaxEngine {
    /// Project a year's calculation into one event per taxable item: each
    /// positive gain record, each dividend or coupon payment and each
    /// interest payment. Losses produce no event.
    pub fn generate_tax_events(
        &self,
        user_id: &str,
        transactions: &[Transaction],
        holdings: &[Holding],
        cash_flows: &[CashFlow],
        tax_year: i32,
    ) -> Result<Vec<TaxEvent>, ValidationError> {
        let calculation = self.calculate(transactions, holdings, cash_flows, tax_year)?;
        let result = &calculation.result;
        let mut events = Vec::new();

        for gain in result.capital_gains.iter().filter(|g| g.gain > Decimal::ZERO) {
            events.push(TaxEvent {
                user_id: user_id.to_string(),
                tax_year: result.tax_year,
                event_type: TaxEventType::CapitalGain,
                taxable_amount: gain.gain,
                tax_rate: gain.tax_rate,
                tax_owed: gain.tax_owed,
                holding_id: Some(gain.holding_id.clone()),
                event_date: gain.sale_date,
                notes: format!(
                    "Sale of {} units of {}",
                    gain.quantity.normalize(),
                    gain.holding_name
                ),
            });
        }

        for payment in &calculation.income.dividend_events {
            events.push(income_event(
                user_id,
                result.tax_year,
                TaxEventType::Dividend,
                italy::DIVIDENDS,
                payment,
            ));
        }

        for payment in &calculation.income.interest_events {
            events.push(income_event(
                user_id,
                result.tax_year,
                TaxEventType::Interest,
                italy::INTEREST,
                payment,
            ));
        }

        log::debug!("Generated {} tax event(s) for {}", events.len(), result.tax_year);
        Ok(events)
    }
}

fn income_event(
    user_id: &str,
    tax_year: TaxYear,
    event_type: TaxEventType,
    rate: Decimal,
    payment: &IncomeEvent,
) -> TaxEvent {
    let notes = match payment.kind {
        FlowKind::Coupon => "Coupon payment",
        FlowKind::Interest => "Interest payment",
        _ => "Dividend payment",
    };
    TaxEvent {
        user_id: user_id.to_string(),
        tax_year,
        event_type,
        taxable_amount: payment.amount,
        tax_rate: rate,
        tax_owed: payment.amount * rate,
        holding_id: payment.holding_id.clone(),
        event_date: payment.date,
        notes: notes.to_string(),
    }
}

/// [`TaxEngine::generate_tax_events`] with default options
pub fn generate_tax_events(
    user_id: &str,
    transactions: &[Transaction],
    holdings: &[Holding],
    cash_flows: &[CashFlow],
    tax_year: i32,
) -> Result<Vec<TaxEvent>, ValidationError> {
    TaxEngine::default().generate_tax_events(user_id, transactions, holdings, cash_flows, tax_year)
}
