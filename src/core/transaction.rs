use super::validation::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of transaction. Only buys and sells take part in gain matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Buy,
    Sell,
    Dividend,
    Coupon,
    Split,
    Deposit,
    Withdrawal,
}

/// A transaction as supplied by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    pub id: String,
    #[serde(alias = "asset_id")]
    pub holding_id: String,
    #[serde(alias = "transaction_type")]
    pub kind: TransactionKind,
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    /// Unit price in the reporting currency
    #[schemars(with = "f64")]
    pub price: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub fee: Decimal,
    /// When the transaction happened, in UTC (YYYY-MM-DD or RFC3339).
    /// Same-day transactions are ordered by time.
    #[serde(
        rename = "date",
        alias = "transaction_date",
        deserialize_with = "deserialize_timestamp"
    )]
    #[schemars(with = "String")]
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Transaction {
    /// Calendar date, used for tax-year checks and display
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Reject values that would produce nonsensical gains
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity < Decimal::ZERO {
            return Err(ValidationError::NegativeQuantity {
                id: self.id.clone(),
                quantity: self.quantity,
            });
        }
        if self.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice {
                id: self.id.clone(),
                price: self.price,
            });
        }
        if self.fee < Decimal::ZERO {
            return Err(ValidationError::NegativeFee {
                id: self.id.clone(),
                fee: self.fee,
            });
        }
        Ok(())
    }
}

/// Parse a timestamp. Offsets are normalised to UTC; a bare date means
/// midnight.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, ValidationError> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    Err(ValidationError::InvalidDate(s.to_string()))
}

/// Parse a date, accepting datetimes and keeping only the calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    parse_timestamp(s).map(|dt| dt.date())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(|err| serde::de::Error::custom(err.to_string()))
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_date(&s).map_err(|err| serde::de::Error::custom(err.to_string()))
}
