use super::holding::{AssetClass, Holding, Position};
use super::italy::CRYPTO_THRESHOLD;
use super::validation::{checked_sum, ValidationError};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current crypto exposure compared against the reporting threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CryptoThreshold {
    pub exceeded: bool,
    #[schemars(with = "f64")]
    pub total_value: Decimal,
    #[schemars(with = "f64")]
    pub threshold: Decimal,
}

/// Positions carried by the holdings themselves, keyed by holding id
pub fn current_values(holdings: &[Holding]) -> HashMap<String, Position> {
    holdings
        .iter()
        .filter_map(|h| h.position.map(|p| (h.id.clone(), p)))
        .collect()
}

/// Sum the current value of crypto holdings. Holdings without a known
/// position count as zero. The comparison is strict: exactly at the
/// threshold is not exceeded.
pub fn check_crypto_threshold(
    holdings: &[Holding],
    current_values: &HashMap<String, Position>,
) -> Result<CryptoThreshold, ValidationError> {
    let values = holdings
        .iter()
        .filter(|h| h.asset_class == AssetClass::Crypto)
        .filter_map(|h| current_values.get(&h.id).map(|p| (h, p)))
        .map(|(h, p)| p.value().ok_or_else(|| ValidationError::overflow(&h.id)))
        .collect::<Result<Vec<_>, _>>()?;
    let total_value = checked_sum(values, "crypto holdings")?;

    let exceeded = total_value > CRYPTO_THRESHOLD;
    if exceeded {
        log::info!(
            "Crypto holdings worth {} exceed the {} threshold",
            total_value,
            CRYPTO_THRESHOLD
        );
    }

    Ok(CryptoThreshold {
        exceeded,
        total_value,
        threshold: CRYPTO_THRESHOLD,
    })
}
