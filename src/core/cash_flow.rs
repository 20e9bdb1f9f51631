use super::transaction::deserialize_date;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Dividend,
    Coupon,
    Rent,
    Interest,
    Other,
}

impl FlowKind {
    /// Dividends and bond coupons are both reported as dividend income
    pub fn is_dividend_income(self) -> bool {
        matches!(self, FlowKind::Dividend | FlowKind::Coupon)
    }

    pub fn is_interest_income(self) -> bool {
        self == FlowKind::Interest
    }
}

/// Income received (or expected) from a holding or a whole portfolio
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CashFlow {
    pub id: String,
    /// Absent for portfolio-level flows
    #[serde(default, alias = "asset_id")]
    pub holding_id: Option<String>,
    #[serde(default)]
    pub portfolio_id: Option<String>,
    #[serde(alias = "flow_type")]
    pub kind: FlowKind,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(alias = "payment_date", deserialize_with = "deserialize_date")]
    #[schemars(with = "String")]
    pub date: NaiveDate,
    /// Provisional flows, excluded from realized income
    #[serde(default)]
    pub is_forecasted: bool,
    #[serde(default)]
    pub is_recurring: bool,
}
