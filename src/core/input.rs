use super::calculation::{TaxCalculationResult, TaxEngine};
use super::cash_flow::CashFlow;
use super::holding::Holding;
use super::tax_events::TaxEvent;
use super::threshold::{check_crypto_threshold, current_values, CryptoThreshold};
use super::transaction::Transaction;
use super::validation::ValidationError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

/// Input root: everything the engine needs for one user
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TaxInput {
    #[serde(default, alias = "assets")]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub cash_flows: Vec<CashFlow>,
}

/// Read the input document from JSON
pub fn read_input_json<R: Read>(reader: R) -> anyhow::Result<TaxInput> {
    let input: TaxInput = serde_json::from_reader(reader)?;
    log::debug!(
        "Loaded {} holding(s), {} transaction(s), {} cash flow(s)",
        input.holdings.len(),
        input.transactions.len(),
        input.cash_flows.len()
    );
    Ok(input)
}

impl TaxInput {
    /// Restrict to the given portfolios. An empty list keeps everything.
    ///
    /// Holdings and cash flows are filtered by portfolio; transactions follow
    /// their holding. Cash flows without a portfolio are kept only when their
    /// holding survives the filter.
    pub fn scoped_to(self, portfolio_ids: &[String]) -> TaxInput {
        if portfolio_ids.is_empty() {
            return self;
        }
        let in_scope = |portfolio_id: &Option<String>| {
            portfolio_id
                .as_ref()
                .is_some_and(|p| portfolio_ids.contains(p))
        };

        let holdings: Vec<Holding> = self
            .holdings
            .into_iter()
            .filter(|h| in_scope(&h.portfolio_id))
            .collect();
        let holding_ids: HashSet<&str> = holdings.iter().map(|h| h.id.as_str()).collect();

        let transactions = self
            .transactions
            .into_iter()
            .filter(|tx| holding_ids.contains(tx.holding_id.as_str()))
            .collect();
        let cash_flows = self
            .cash_flows
            .into_iter()
            .filter(|cf| match &cf.portfolio_id {
                Some(_) => in_scope(&cf.portfolio_id),
                None => cf
                    .holding_id
                    .as_deref()
                    .is_some_and(|id| holding_ids.contains(id)),
            })
            .collect();

        TaxInput {
            holdings,
            transactions,
            cash_flows,
        }
    }

    pub fn calculate_taxes(
        &self,
        engine: &TaxEngine,
        tax_year: i32,
    ) -> Result<TaxCalculationResult, ValidationError> {
        engine.calculate_taxes(&self.transactions, &self.holdings, &self.cash_flows, tax_year)
    }

    pub fn generate_tax_events(
        &self,
        engine: &TaxEngine,
        user_id: &str,
        tax_year: i32,
    ) -> Result<Vec<TaxEvent>, ValidationError> {
        engine.generate_tax_events(
            user_id,
            &self.transactions,
            &self.holdings,
            &self.cash_flows,
            tax_year,
        )
    }

    pub fn generate_tax_report(
        &self,
        engine: &TaxEngine,
        tax_year: i32,
    ) -> Result<String, ValidationError> {
        engine.generate_tax_report(&self.transactions, &self.holdings, &self.cash_flows, tax_year)
    }

    pub fn check_crypto_threshold(&self) -> Result<CryptoThreshold, ValidationError> {
        check_crypto_threshold(&self.holdings, &current_values(&self.holdings))
    }
}
