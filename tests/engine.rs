//! Library-level scenarios over the sample portfolio in tests/data

use imposta::{
    parse_total_tax, read_input_json, EngineOptions, SellPolicy, TaxEngine, TaxEventType,
    TaxInput, ValidationError,
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::fs::File;

fn load() -> TaxInput {
    let file = File::open("tests/data/portfolio.json").expect("fixture should exist");
    read_input_json(file).expect("fixture should parse")
}

fn engine(sell_policy: SellPolicy) -> TaxEngine {
    TaxEngine::new(EngineOptions { sell_policy })
}

#[test]
fn full_year_totals() {
    let input = load();
    let result = input
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();

    assert_eq!(result.tax_year.year(), 2024);
    assert_eq!(result.gain_count(), 6);
    assert_eq!(result.loss_count(), 1);
    assert_eq!(result.total_capital_gains, dec!(2840));
    assert_eq!(result.breakdown.capital_gains_tax, dec!(746));
    assert_eq!(result.dividend_income, dec!(97.90));
    assert_eq!(result.breakdown.dividend_tax, dec!(25.454));
    assert_eq!(result.interest_income, dec!(20));
    assert_eq!(result.breakdown.interest_tax, dec!(5.2));
    assert_eq!(result.total_taxable_income, dec!(2957.90));
    assert_eq!(result.total_tax_owed, dec!(776.654));
    assert!(result.warnings.is_empty());
}

#[test]
fn gains_follow_fifo_and_input_order() {
    let result = load()
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();

    let summary: Vec<(&str, Decimal, Decimal)> = result
        .capital_gains
        .iter()
        .map(|g| (g.holding_id.as_str(), g.quantity, g.gain))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("eni", dec!(100), dec!(400)),
            ("eni", dec!(50), dec!(100)),
            ("btp-2028", dec!(1000), dec!(40)),
            ("bund-2030", dec!(10), dec!(-50)),
            ("btc", dec!(0.05), dec!(1750)),
            ("btc", dec!(0.03), dec!(600)),
        ]
    );
}

#[test]
fn rates_by_asset_class_and_issuer() {
    let result = load()
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();

    let rate_of = |id: &str| {
        result
            .capital_gains
            .iter()
            .find(|g| g.holding_id == id)
            .map(|g| g.tax_rate)
            .unwrap()
    };
    assert_eq!(rate_of("eni"), dec!(0.26));
    assert_eq!(rate_of("btp-2028"), dec!(0.125));
    assert_eq!(rate_of("bund-2030"), dec!(0.26));
    assert_eq!(rate_of("btc"), dec!(0.26));
}

#[test]
fn losses_owe_no_tax_but_reduce_net_gain() {
    let result = load()
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();

    let loss = result
        .capital_gains
        .iter()
        .find(|g| g.is_loss())
        .unwrap();
    assert_eq!(loss.holding_id, "bund-2030");
    assert_eq!(loss.tax_owed, Decimal::ZERO);

    let positive: Decimal = result
        .capital_gains
        .iter()
        .filter(|g| !g.is_loss())
        .map(|g| g.gain)
        .sum();
    assert_eq!(result.total_capital_gains, positive - dec!(50));
}

#[test]
fn prior_year_sale_drains_queue_by_default() {
    let consume_all = load()
        .calculate_taxes(&engine(SellPolicy::ConsumeAll), 2024)
        .unwrap();
    let target_only = load()
        .calculate_taxes(&engine(SellPolicy::TargetYearOnly), 2024)
        .unwrap();

    let btc_gain = |r: &imposta::TaxCalculationResult| -> Decimal {
        r.capital_gains
            .iter()
            .filter(|g| g.holding_id == "btc")
            .map(|g| g.gain)
            .sum()
    };
    assert_eq!(btc_gain(&consume_all), dec!(2350));
    // The 2023 sale leaves the first lot untouched
    assert_eq!(btc_gain(&target_only), dec!(2800));
    assert_eq!(target_only.gain_count(), 5);
}

#[test]
fn earlier_year_only_sees_its_own_events() {
    let result = load()
        .calculate_taxes(&TaxEngine::default(), 2023)
        .unwrap();

    assert_eq!(result.gain_count(), 1);
    let gain = &result.capital_gains[0];
    assert_eq!(gain.holding_id, "btc");
    assert_eq!(gain.gain, dec!(250));
    assert_eq!(result.dividend_income, dec!(70));
    assert_eq!(result.interest_income, Decimal::ZERO);
}

#[test]
fn year_without_activity_is_empty() {
    let result = load()
        .calculate_taxes(&TaxEngine::default(), 2019)
        .unwrap();

    assert!(result.capital_gains.is_empty());
    assert_eq!(result.total_taxable_income, Decimal::ZERO);
    assert_eq!(result.total_tax_owed, Decimal::ZERO);
}

#[test]
fn forecasted_coupon_is_excluded() {
    let mut input = load();
    let before = input
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();

    for flow in input.cash_flows.iter_mut() {
        flow.is_forecasted = false;
    }
    let after = input
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();

    assert_eq!(after.dividend_income - before.dividend_income, dec!(12.40));
}

#[test]
fn crypto_threshold_from_positions() {
    let input = load();
    let threshold = input.check_crypto_threshold().unwrap();
    assert!(threshold.exceeded);
    assert_eq!(threshold.total_value, dec!(4200));
    assert_eq!(threshold.threshold, dec!(2000));

    let result = input
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();
    assert_eq!(result.crypto_threshold, threshold);
}

#[test]
fn calculation_is_idempotent() {
    let input = load();
    let engine = TaxEngine::default();
    let first = input.calculate_taxes(&engine, 2024).unwrap();
    let second = input.calculate_taxes(&engine, 2024).unwrap();
    assert_eq!(first, second);
}

#[test]
fn report_total_matches_result() {
    let input = load();
    let engine = TaxEngine::default();
    let result = input.calculate_taxes(&engine, 2024).unwrap();
    let report = input.generate_tax_report(&engine, 2024).unwrap();

    assert!(report.starts_with("DICHIARAZIONE REDDITI 2024\n"));
    assert!(report.contains("  1. ENI S.p.A.\n"));
    assert!(report.contains("     Imposta (12.5%): EUR 5.00\n"));
    assert!(report.contains("  Dividendi: EUR 97.90\n"));
    assert!(report.contains("  Imposte dovute: EUR 776.65\n"));
    assert_eq!(
        parse_total_tax(&report),
        Some(
            result
                .total_tax_owed
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        )
    );
}

#[test]
fn events_reconcile_with_result() {
    let input = load();
    let engine = TaxEngine::default();
    let result = input.calculate_taxes(&engine, 2024).unwrap();
    let events = input.generate_tax_events(&engine, "user-42", 2024).unwrap();

    assert_eq!(events.len(), 8);
    assert!(events.iter().all(|e| e.user_id == "user-42"));
    assert!(events.iter().all(|e| e.tax_year.year() == 2024));

    let count = |t: TaxEventType| events.iter().filter(|e| e.event_type == t).count();
    assert_eq!(count(TaxEventType::CapitalGain), 5);
    assert_eq!(count(TaxEventType::Dividend), 2);
    assert_eq!(count(TaxEventType::Interest), 1);

    let tax: Decimal = events.iter().map(|e| e.tax_owed).sum();
    assert_eq!(tax, result.total_tax_owed);
}

#[test]
fn portfolio_scope_limits_holdings_and_flows() {
    let input = load().scoped_to(&["p2".to_string()]);
    assert_eq!(input.holdings.len(), 1);
    assert_eq!(input.transactions.len(), 4);

    let result = input
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();
    assert_eq!(result.total_capital_gains, dec!(2350));
    assert_eq!(result.total_tax_owed, dec!(611));
    // Rent is neither dividend nor interest income
    assert_eq!(result.dividend_income, Decimal::ZERO);
    assert_eq!(result.interest_income, Decimal::ZERO);
}

#[test]
fn invalid_year_is_rejected() {
    let err = load()
        .calculate_taxes(&TaxEngine::default(), 99999)
        .unwrap_err();
    assert_eq!(err, ValidationError::InvalidTaxYear(99999));
}

#[test]
fn unknown_holding_is_reported_not_fatal() {
    let json = r#"{
        "holdings": [],
        "transactions": [
            { "id": "t1", "holding_id": "ghost", "kind": "buy", "quantity": 1, "price": 10, "date": "2024-01-02" },
            { "id": "t2", "holding_id": "ghost", "kind": "sell", "quantity": 1, "price": 12, "date": "2024-02-02" }
        ]
    }"#;
    let input = read_input_json(json.as_bytes()).unwrap();
    let result = input
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();

    assert!(result.capital_gains.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].holding_id(), "ghost");
}

#[test]
fn intraday_order_follows_timestamps() {
    let json = r#"{
        "holdings": [ { "id": "eni", "name": "ENI", "asset_class": "equity" } ],
        "transactions": [
            { "id": "s1", "holding_id": "eni", "kind": "sell", "quantity": 1, "price": 20, "date": "2024-03-01T16:00:00Z" },
            { "id": "b1", "holding_id": "eni", "kind": "buy", "quantity": 1, "price": 10, "date": "2024-03-01T09:00:00Z" }
        ]
    }"#;
    let input = read_input_json(json.as_bytes()).unwrap();
    let result = input
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap();

    assert_eq!(result.gain_count(), 1);
    assert_eq!(result.capital_gains[0].gain, dec!(10));
    assert!(result.warnings.is_empty());
}

#[test]
fn oversized_trade_is_rejected_without_panicking() {
    let json = r#"{
        "holdings": [ { "id": "eni", "name": "ENI", "asset_class": "equity" } ],
        "transactions": [
            { "id": "b1", "holding_id": "eni", "kind": "buy", "quantity": "100000000000000000", "price": 1, "date": "2023-01-10" },
            { "id": "s1", "holding_id": "eni", "kind": "sell", "quantity": "100000000000000000", "price": "1000000000000000", "date": "2024-01-10" }
        ]
    }"#;
    let input = read_input_json(json.as_bytes()).unwrap();
    let err = input
        .calculate_taxes(&TaxEngine::default(), 2024)
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::Overflow {
            id: "s1".to_string()
        }
    );
}
