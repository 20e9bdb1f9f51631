use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Data-quality findings. These never stop a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Transactions reference a holding that was not supplied; they were skipped.
    UnknownHolding {
        holding_id: String,
        transactions: usize,
    },
    /// A sale exceeded the open lots. The unmatched quantity produced no record.
    InsufficientLots {
        holding_id: String,
        transaction_id: String,
        sale_date: NaiveDate,
        #[schemars(with = "f64")]
        sold: Decimal,
        #[schemars(with = "f64")]
        unmatched: Decimal,
    },
}

impl Warning {
    pub fn holding_id(&self) -> &str {
        match self {
            Warning::UnknownHolding { holding_id, .. } => holding_id,
            Warning::InsufficientLots { holding_id, .. } => holding_id,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Warning::UnknownHolding { transactions, .. } => {
                format!("{transactions} transaction(s) reference an unknown holding and were skipped")
            }
            Warning::InsufficientLots {
                transaction_id,
                sale_date,
                sold,
                unmatched,
                ..
            } => format!(
                "sale {} on {} of {} units left {} units without a purchase lot",
                transaction_id,
                sale_date.format("%Y-%m-%d"),
                sold.normalize(),
                unmatched.normalize()
            ),
        }
    }
}
