use super::holding::{AssetClass, Holding};
use super::italy::{resolve_rate, TaxYear};
use super::transaction::{Transaction, TransactionKind};
use super::validation::{checked_sum, ValidationError};
use super::warnings::Warning;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// What a sale outside the tax year does to the lot queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SellPolicy {
    /// Every sale consumes lots, whatever its year
    #[default]
    ConsumeAll,
    /// Only sales inside the tax year consume lots. Earlier sales leave their
    /// lots open, so later sales can match units that were already sold.
    TargetYearOnly,
}

/// Quantity of a holding bought at one price on one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lot {
    pub quantity: Decimal,
    pub price: Decimal,
    pub date: NaiveDate,
}

/// A portion of a sale matched against a portion of a lot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotMatch {
    pub quantity: Decimal,
    pub price: Decimal,
    pub date: NaiveDate,
}

/// FIFO queue of open lots for one holding
#[derive(Debug, Default)]
pub struct LotQueue {
    holding_id: String,
    lots: VecDeque<Lot>,
}

impl LotQueue {
    pub fn new(holding_id: &str) -> Self {
        LotQueue {
            holding_id: holding_id.to_string(),
            lots: VecDeque::new(),
        }
    }

    /// Append a lot to the back of the queue. Empty lots are never queued.
    pub fn push(&mut self, lot: Lot) {
        if lot.quantity <= Decimal::ZERO {
            return;
        }
        log::debug!(
            "Lots {} PUSH: qty={}, price={}, date={}. Open lots: {}",
            self.holding_id,
            lot.quantity,
            lot.price,
            lot.date,
            self.lots.len() + 1
        );
        self.lots.push_back(lot);
    }

    /// Consume up to `quantity` units from the front of the queue.
    ///
    /// Returns one match per lot touched, oldest first. If the queue runs dry
    /// the matched quantities sum to less than `quantity`.
    pub fn consume(&mut self, quantity: Decimal) -> Vec<LotMatch> {
        let mut remaining = quantity;
        let mut matches = Vec::new();

        while remaining > Decimal::ZERO {
            let Some(front) = self.lots.front_mut() else {
                break;
            };
            let matched = remaining.min(front.quantity);
            matches.push(LotMatch {
                quantity: matched,
                price: front.price,
                date: front.date,
            });
            front.quantity -= matched;
            remaining -= matched;
            log::debug!(
                "Lots {} TAKE: qty={} @ {} from {}. Lot remaining: {}",
                self.holding_id,
                matched,
                front.price,
                front.date,
                front.quantity
            );
            if front.quantity.is_zero() {
                self.lots.pop_front();
            }
        }

        matches
    }
}

#[cfg(test)]
impl LotQueue {
    fn total_quantity(&self) -> Decimal {
        self.lots.iter().map(|l| l.quantity).sum()
    }

    fn len(&self) -> usize {
        self.lots.len()
    }

    fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}

/// Realized gain or loss on one lot portion sold in the tax year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CapitalGainRecord {
    pub holding_id: String,
    pub holding_name: String,
    pub asset_class: AssetClass,
    #[schemars(with = "String")]
    pub purchase_date: NaiveDate,
    #[schemars(with = "String")]
    pub sale_date: NaiveDate,
    #[schemars(with = "f64")]
    pub purchase_price: Decimal,
    #[schemars(with = "f64")]
    pub sale_price: Decimal,
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    #[schemars(with = "f64")]
    pub gain: Decimal,
    #[schemars(with = "f64")]
    pub tax_rate: Decimal,
    /// Zero for losses; losses are never taxed
    #[schemars(with = "f64")]
    pub tax_owed: Decimal,
}

impl CapitalGainRecord {
    pub fn is_loss(&self) -> bool {
        self.gain < Decimal::ZERO
    }
}

/// Output of the lot matcher
#[derive(Debug, Default)]
pub struct GainsReport {
    pub gains: Vec<CapitalGainRecord>,
    pub warnings: Vec<Warning>,
}

/// Match sales against purchases first-in first-out, per holding.
///
/// Transactions are grouped by holding in order of first appearance and
/// stably sorted by timestamp within each group, so transactions at the same
/// instant keep their arrival order. Only sales dated in `tax_year` produce
/// records.
pub fn match_gains(
    transactions: &[Transaction],
    holdings: &[Holding],
    tax_year: TaxYear,
    policy: SellPolicy,
) -> Result<GainsReport, ValidationError> {
    let holdings_by_id: HashMap<&str, &Holding> =
        holdings.iter().map(|h| (h.id.as_str(), h)).collect();

    let mut report = GainsReport::default();

    for (holding_id, mut txs) in group_by_holding(transactions) {
        let Some(holding) = holdings_by_id.get(holding_id) else {
            log::warn!(
                "Skipping {} transaction(s) for unknown holding {}",
                txs.len(),
                holding_id
            );
            report.warnings.push(Warning::UnknownHolding {
                holding_id: holding_id.to_string(),
                transactions: txs.len(),
            });
            continue;
        };

        txs.sort_by_key(|tx| tx.timestamp);
        match_holding(holding, &txs, tax_year, policy, &mut report)?;
    }

    Ok(report)
}

fn match_holding(
    holding: &Holding,
    txs: &[&Transaction],
    tax_year: TaxYear,
    policy: SellPolicy,
    report: &mut GainsReport,
) -> Result<(), ValidationError> {
    let rate = resolve_rate(holding.asset_class, &holding.metadata);
    let mut queue = LotQueue::new(&holding.id);

    for tx in txs {
        match tx.kind {
            TransactionKind::Buy => queue.push(Lot {
                quantity: tx.quantity,
                price: tx.price,
                date: tx.date(),
            }),
            TransactionKind::Sell if tax_year.contains(tx.date()) => {
                let matches = queue.consume(tx.quantity);
                let matched = checked_sum(matches.iter().map(|m| m.quantity), &tx.id)?;

                for m in matches {
                    let gain = tx
                        .price
                        .checked_sub(m.price)
                        .and_then(|diff| diff.checked_mul(m.quantity))
                        .ok_or_else(|| ValidationError::overflow(&tx.id))?;
                    let tax_owed = if gain > Decimal::ZERO {
                        gain.checked_mul(rate)
                            .ok_or_else(|| ValidationError::overflow(&tx.id))?
                    } else {
                        Decimal::ZERO
                    };
                    report.gains.push(CapitalGainRecord {
                        holding_id: holding.id.clone(),
                        holding_name: holding.name.clone(),
                        asset_class: holding.asset_class,
                        purchase_date: m.date,
                        sale_date: tx.date(),
                        purchase_price: m.price,
                        sale_price: tx.price,
                        quantity: m.quantity,
                        gain,
                        tax_rate: rate,
                        tax_owed,
                    });
                }

                if matched < tx.quantity {
                    let unmatched = tx.quantity - matched;
                    log::warn!(
                        "Sale {} of {} {} exceeds open lots by {}",
                        tx.id,
                        tx.quantity,
                        holding.id,
                        unmatched
                    );
                    report.warnings.push(Warning::InsufficientLots {
                        holding_id: holding.id.clone(),
                        transaction_id: tx.id.clone(),
                        sale_date: tx.date(),
                        sold: tx.quantity,
                        unmatched,
                    });
                }
            }
            TransactionKind::Sell => {
                if policy == SellPolicy::ConsumeAll {
                    queue.consume(tx.quantity);
                }
            }
            TransactionKind::Dividend
            | TransactionKind::Coupon
            | TransactionKind::Split
            | TransactionKind::Deposit
            | TransactionKind::Withdrawal => {}
        }
    }

    Ok(())
}

/// Partition transactions by holding, keeping first-appearance order
fn group_by_holding(transactions: &[Transaction]) -> Vec<(&str, Vec<&Transaction>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Transaction>)> = Vec::new();

    for tx in transactions {
        let slot = *index.entry(tx.holding_id.as_str()).or_insert_with(|| {
            groups.push((tx.holding_id.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(tx);
    }

    groups
}
