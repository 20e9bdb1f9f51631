pub mod calculation;
pub mod cash_flow;
pub mod fifo;
pub mod holding;
pub mod income;
pub mod input;
pub mod italy;
pub mod tax_events;
pub mod text_report;
pub mod threshold;
pub mod transaction;
pub mod validation;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use calculation::{calculate_taxes, EngineOptions, TaxBreakdown, TaxCalculationResult, TaxEngine};
pub use cash_flow::{CashFlow, FlowKind};
pub use fifo::{match_gains, CapitalGainRecord, GainsReport, Lot, LotQueue, SellPolicy};
pub use holding::{AssetClass, Holding, Metadata, Position};
pub use income::{aggregate_income, IncomeEvent, IncomeReport};
pub use input::{read_input_json, TaxInput};
pub use italy::{resolve_rate, TaxYear};
pub use tax_events::{generate_tax_events, TaxEvent, TaxEventType};
pub use text_report::{generate_tax_report, parse_total_tax, render_report};
pub use threshold::{check_crypto_threshold, current_values, CryptoThreshold};
pub use transaction::{parse_date, parse_timestamp, Transaction, TransactionKind};
pub use validation::{validate_inputs, ValidationError};
pub use warnings::Warning;
