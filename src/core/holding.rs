use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Asset classification, drives the capital gains rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    #[serde(alias = "stock")]
    Equity,
    Bond,
    #[serde(alias = "etf")]
    Fund,
    Crypto,
    #[serde(alias = "real-estate")]
    RealEstate,
    #[serde(alias = "luxury", alias = "luxury-good")]
    LuxuryGood,
    Commodity,
    Cash,
}

impl AssetClass {
    pub fn display(&self) -> &'static str {
        match self {
            AssetClass::Equity => "Equity",
            AssetClass::Bond => "Bond",
            AssetClass::Fund => "Fund",
            AssetClass::Crypto => "Crypto",
            AssetClass::RealEstate => "Real Estate",
            AssetClass::LuxuryGood => "Luxury Good",
            AssetClass::Commodity => "Commodity",
            AssetClass::Cash => "Cash",
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Typed holding metadata. Unknown keys in the input are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Metadata {
    /// ISO country code of the issuer (bonds)
    #[serde(default, alias = "issuing_country")]
    pub country: Option<String>,
    #[serde(default)]
    pub isin: Option<String>,
    /// Ticker or coin symbol
    #[serde(default)]
    pub symbol: Option<String>,
}

impl Metadata {
    pub fn is_issued_in(&self, country: &str) -> bool {
        self.country
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(country))
    }
}

/// Quantity currently held and its latest unit price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    #[schemars(with = "f64")]
    pub current_price: Decimal,
}

impl Position {
    /// `None` when the product is out of range
    pub fn value(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.current_price)
    }
}

/// A holding as supplied by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Holding {
    pub id: String,
    pub name: String,
    #[serde(alias = "asset_type")]
    pub asset_class: AssetClass,
    #[serde(default)]
    pub portfolio_id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub position: Option<Position>,
}
