use super::italy::TaxYear;
use super::transaction::Transaction;
use rust_decimal::Decimal;

/// Caller data rejected before any calculation runs
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid tax year: {0}")]
    InvalidTaxYear(i32),
    #[error("negative quantity {quantity} in transaction {id}")]
    NegativeQuantity { id: String, quantity: Decimal },
    #[error("negative price {price} in transaction {id}")]
    NegativePrice { id: String, price: Decimal },
    #[error("negative fee {fee} in transaction {id}")]
    NegativeFee { id: String, fee: Decimal },
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("amount out of range in {id}")]
    Overflow { id: String },
}

impl ValidationError {
    pub(crate) fn overflow(id: &str) -> Self {
        ValidationError::Overflow { id: id.to_string() }
    }
}

/// Sum amounts, failing instead of panicking when the total leaves the
/// representable range
pub(crate) fn checked_sum<I>(amounts: I, id: &str) -> Result<Decimal, ValidationError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |total, amount| {
        total
            .checked_add(amount)
            .ok_or_else(|| ValidationError::overflow(id))
    })
}

/// Check the tax year and every transaction, failing on the first problem
pub fn validate_inputs(
    transactions: &[Transaction],
    tax_year: i32,
) -> Result<TaxYear, ValidationError> {
    let tax_year = TaxYear::new(tax_year)?;
    for tx in transactions {
        tx.validate()?;
    }
    Ok(tax_year)
}
