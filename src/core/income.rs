use super::cash_flow::{CashFlow, FlowKind};
use super::italy::TaxYear;
use super::validation::{checked_sum, ValidationError};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Realized capital income for one tax year
#[derive(Debug, Default)]
pub struct IncomeReport {
    /// Dividend and coupon payments
    pub dividend_events: Vec<IncomeEvent>,
    pub interest_events: Vec<IncomeEvent>,
}

impl IncomeReport {
    pub fn dividend_income(&self) -> Result<Decimal, ValidationError> {
        checked_sum(self.dividend_events.iter().map(|e| e.amount), "dividend income")
    }

    pub fn interest_income(&self) -> Result<Decimal, ValidationError> {
        checked_sum(self.interest_events.iter().map(|e| e.amount), "interest income")
    }
}

/// Individual income payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeEvent {
    pub cash_flow_id: String,
    pub holding_id: Option<String>,
    pub kind: FlowKind,
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl From<&CashFlow> for IncomeEvent {
    fn from(flow: &CashFlow) -> Self {
        IncomeEvent {
            cash_flow_id: flow.id.clone(),
            holding_id: flow.holding_id.clone(),
            kind: flow.kind,
            date: flow.date,
            amount: flow.amount,
        }
    }
}

/// Collect received dividends, coupons and interest paid in `tax_year`.
/// Forecasted flows, rent and other flows are left out.
pub fn aggregate_income(cash_flows: &[CashFlow], tax_year: TaxYear) -> IncomeReport {
    let mut report = IncomeReport::default();

    for flow in cash_flows {
        if flow.is_forecasted || !tax_year.contains(flow.date) {
            continue;
        }
        if flow.kind.is_dividend_income() {
            report.dividend_events.push(flow.into());
        } else if flow.kind.is_interest_income() {
            report.interest_events.push(flow.into());
        }
    }

    log::debug!(
        "Income {}: {} dividend/coupon payment(s), {} interest payment(s)",
        tax_year,
        report.dividend_events.len(),
        report.interest_events.len()
    );

    report
}
