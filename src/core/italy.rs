use super::holding::{AssetClass, Metadata};
use super::validation::ValidationError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Standard rate on capital gains (26%)
pub const CAPITAL_GAINS_STANDARD: Decimal = dec!(0.26);
/// Reduced rate for Italian government bonds (BTP, BOT, CCT...)
pub const CAPITAL_GAINS_GOV_BONDS: Decimal = dec!(0.125);
/// Rate on crypto gains. Numerically equal to the standard rate today.
pub const CAPITAL_GAINS_CRYPTO: Decimal = dec!(0.26);
/// Rate on dividends and bond coupons
pub const DIVIDENDS: Decimal = dec!(0.26);
/// Rate on interest income
pub const INTEREST: Decimal = dec!(0.26);

/// Crypto holdings above this value (EUR) trigger the reporting warning
pub const CRYPTO_THRESHOLD: Decimal = dec!(2000);

/// Issuing country that qualifies a bond for the reduced rate
pub const DOMESTIC_COUNTRY: &str = "IT";

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

/// Italian tax year. Matches the calendar year (1 January to 31 December).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TaxYear(i32);

impl TaxYear {
    /// Validated constructor
    pub fn new(year: i32) -> Result<Self, ValidationError> {
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Ok(TaxYear(year))
        } else {
            Err(ValidationError::InvalidTaxYear(year))
        }
    }

    pub fn year(&self) -> i32 {
        self.0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.0
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pick the capital gains rate for a holding.
///
/// Precedence:
/// 1. Bond issued by Italy: reduced government bond rate
/// 2. Crypto: crypto rate
/// 3. Anything else: standard rate
pub fn resolve_rate(asset_class: AssetClass, metadata: &Metadata) -> Decimal {
    match asset_class {
        AssetClass::Bond if metadata.is_issued_in(DOMESTIC_COUNTRY) => CAPITAL_GAINS_GOV_BONDS,
        AssetClass::Crypto => CAPITAL_GAINS_CRYPTO,
        _ => CAPITAL_GAINS_STANDARD,
    }
}
