//! Integration tests for pad resolution.
//!
//! Scenarios cover synthesis, pad consumption, redundant and unused pads,
//! parent-account families, multiple currencies, lots held at cost,
//! same-date ordering, tolerances, closed sub-accounts, amounts too large for
//! a decimal, and rerunning on resolved output.

use padledger_core::{
    sort_directives, Amount, Balance, Close, Cost, Directive, MetaValue, NaiveDate, Open, Pad, Posting,
    Transaction,
};
use padledger_engine::{
    process_pads, process_pads_with_options, walk_account, ErrorCode, ErrorKind, Options,
    PadResult, Severity, WalkItem,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Helper Functions
// ============================================================================

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn open(d: NaiveDate, account: &str) -> Directive {
    Directive::Open(Open::new(d, account))
}

fn pad(d: NaiveDate, account: &str, source: &str) -> Directive {
    Directive::Pad(Pad::new(d, account, source))
}

fn balance(d: NaiveDate, account: &str, number: Decimal, currency: &str) -> Directive {
    Directive::Balance(Balance::new(d, account, Amount::new(number, currency)))
}

fn transfer(d: NaiveDate, to: &str, from: &str, number: Decimal, currency: &str) -> Directive {
    Directive::Transaction(
        Transaction::new(d, "transfer")
            .with_posting(Posting::new(to, Amount::new(number, currency)))
            .with_posting(Posting::new(from, Amount::new(-number, currency))),
    )
}

fn codes(result: &PadResult) -> Vec<ErrorCode> {
    result.errors.iter().map(|e| e.code).collect()
}

fn padding_summary(result: &PadResult) -> Vec<(NaiveDate, String, Amount)> {
    result
        .padding_transactions
        .iter()
        .map(|t| (t.date, t.postings[0].account.to_string(), t.postings[0].units.clone()))
        .collect()
}

// ============================================================================
// Synthesis
// ============================================================================

#[test]
fn test_pad_simple() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        open(date(2013, 5, 1), "Equity:Opening-Balances"),
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening-Balances"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(172.45), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);
    assert_eq!(result.padding_transactions.len(), 1);

    let txn = &result.padding_transactions[0];
    assert_eq!(txn.date, date(2013, 5, 1));
    assert!(txn.is_padding());
    assert_eq!(
        txn.narration,
        "(Padding inserted for Balance of 172.45 USD for difference 172.45 USD)"
    );
    assert_eq!(txn.postings.len(), 2);
    assert_eq!(txn.postings[0].account, "Assets:Checking");
    assert_eq!(txn.postings[0].units, Amount::new(dec!(172.45), "USD"));
    assert_eq!(txn.postings[1].account, "Equity:Opening-Balances");
    assert_eq!(txn.postings[1].units, Amount::new(dec!(-172.45), "USD"));

    let expected: Vec<Directive> = vec![
        directives[0].clone(),
        directives[1].clone(),
        directives[2].clone(),
        Directive::Transaction(txn.clone()),
        directives[3].clone(),
    ];
    assert_eq!(result.directives, expected);
}

#[test]
fn test_input_is_unchanged_and_order_preserved() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        transfer(date(2013, 5, 2), "Assets:Checking", "Income:Job", dec!(10), "USD"),
        pad(date(2013, 5, 5), "Assets:Checking", "Equity:Opening"),
        transfer(date(2013, 5, 6), "Assets:Checking", "Income:Job", dec!(10), "USD"),
        balance(date(2013, 5, 10), "Assets:Checking", dec!(100), "USD"),
    ];
    let snapshot = directives.clone();

    let result = process_pads(&directives);
    assert_eq!(directives, snapshot);

    let originals: Vec<&Directive> = result
        .directives
        .iter()
        .filter(|d| !d.as_transaction().is_some_and(Transaction::is_padding))
        .collect();
    assert_eq!(originals, snapshot.iter().collect::<Vec<_>>());
    assert!(padledger_core::is_sorted(&result.directives));
    assert_eq!(result.padding_transactions[0].postings[0].units.number, dec!(80));
}

#[test]
fn test_pad_metadata_copied_to_padding() {
    let mut p = Pad::new(date(2013, 5, 1), "Assets:Checking", "Equity:Opening");
    p.meta
        .insert("source".to_string(), MetaValue::String("statement".to_string()));
    let directives = vec![
        Directive::Pad(p),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(1), "USD"),
    ];

    let result = process_pads(&directives);
    let meta = &result.padding_transactions[0].meta;
    assert_eq!(
        meta.get("source"),
        Some(&MetaValue::String("statement".to_string()))
    );
}

#[test]
fn test_satisfied_balance_without_pad_is_untouched() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        transfer(date(2013, 5, 2), "Assets:Checking", "Income:Job", dec!(100.00), "USD"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(100.00), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty());
    assert!(result.padding_transactions.is_empty());
    assert_eq!(result.directives, directives);
}

// ============================================================================
// Pad consumption
// ============================================================================

#[test]
fn test_pad_no_overflow() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        open(date(2013, 5, 1), "Assets:Cash"),
        open(date(2013, 5, 1), "Equity:Opening-Balances"),
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening-Balances"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(172.45), "USD"),
        transfer(date(2013, 5, 15), "Assets:Checking", "Assets:Cash", dec!(20.00), "USD"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(200.00), "USD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::BalanceAssertionFailed]);
    assert_eq!(result.errors[0].kind(), ErrorKind::Balance);
    assert_eq!(result.errors[0].date, date(2013, 6, 1));
    assert_eq!(result.errors[0].entry, 6);
    assert_eq!(result.padding_transactions.len(), 1);
}

#[test]
fn test_pad_used_twice_legally() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        open(date(2013, 5, 1), "Assets:Cash"),
        open(date(2013, 5, 1), "Equity:Opening-Balances"),
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening-Balances"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(172.45), "USD"),
        transfer(date(2013, 5, 15), "Assets:Checking", "Assets:Cash", dec!(20), "USD"),
        pad(date(2013, 5, 20), "Assets:Checking", "Equity:Opening-Balances"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(200.00), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);
    assert_eq!(
        padding_summary(&result),
        vec![
            (date(2013, 5, 1), "Assets:Checking".to_string(), Amount::new(dec!(172.45), "USD")),
            (date(2013, 5, 20), "Assets:Checking".to_string(), Amount::new(dec!(7.55), "USD")),
        ]
    );
    assert_eq!(
        result.padding_transactions[1].narration,
        "(Padding inserted for Balance of 200.00 USD for difference 7.55 USD)"
    );
}

#[test]
fn test_pad_used_twice_illegally() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        open(date(2013, 5, 1), "Equity:Opening-Balances"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(0.00), "USD"),
        pad(date(2013, 5, 10), "Assets:Checking", "Equity:Opening-Balances"),
        pad(date(2013, 5, 20), "Assets:Checking", "Equity:Opening-Balances"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(200.00), "USD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::RedundantPad]);
    assert_eq!(result.errors[0].date, date(2013, 5, 10));
    assert_eq!(result.errors[0].entry, 3);
    assert_eq!(result.errors[0].kind(), ErrorKind::Pad);

    // The most recent pad governs and takes the full shortfall.
    assert_eq!(
        padding_summary(&result),
        vec![(date(2013, 5, 20), "Assets:Checking".to_string(), Amount::new(dec!(200.00), "USD"))]
    );
    assert!(matches!(result.directives[4], Directive::Pad(ref p) if p.date == date(2013, 5, 20)));
    assert!(result.directives[5].as_transaction().is_some_and(Transaction::is_padding));
}

#[test]
fn test_three_pads_each_superseded_one_reported() {
    let directives = vec![
        pad(date(2013, 6, 1), "Assets:Checking", "Equity:Opening"),
        pad(date(2013, 7, 1), "Assets:Checking", "Equity:Opening"),
        pad(date(2013, 8, 1), "Assets:Checking", "Equity:Opening"),
        balance(date(2013, 10, 1), "Assets:Checking", dec!(5.00), "USD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::RedundantPad, ErrorCode::RedundantPad]);
    assert_eq!(result.errors[0].entry, 0);
    assert_eq!(result.errors[1].entry, 1);
    assert_eq!(padding_summary(&result)[0].0, date(2013, 8, 1));
}

#[test]
fn test_pad_unused() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        open(date(2013, 5, 1), "Assets:Cash"),
        open(date(2013, 5, 1), "Equity:Opening-Balances"),
        transfer(date(2013, 5, 10), "Assets:Checking", "Assets:Cash", dec!(200.00), "USD"),
        pad(date(2013, 5, 20), "Assets:Checking", "Equity:Opening-Balances"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(200.0), "USD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::UnusedPad]);
    assert_eq!(result.errors[0].severity(), Severity::Warning);
    assert!(!result.has_errors());
    assert!(result.padding_transactions.is_empty());
    assert_eq!(result.directives, directives);
}

#[test]
fn test_pad_without_any_balance_is_unused() {
    let directives = vec![pad(date(2013, 5, 20), "Assets:Checking", "Equity:Opening")];
    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::UnusedPad]);
}

#[test]
fn test_pad_covers_one_balance_date_only() {
    let directives = vec![
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(10), "USD"),
        balance(date(2013, 5, 4), "Assets:Checking", dec!(10), "CAD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::BalanceAssertionFailed]);
    assert_eq!(result.errors[0].date, date(2013, 5, 4));
    assert_eq!(result.padding_transactions.len(), 1);
}

// ============================================================================
// Families and currencies
// ============================================================================

#[test]
fn test_pad_parents() {
    let d = date(2013, 5, 1);
    let directives = vec![
        open(d, "Assets:US"),
        open(d, "Assets:US:Bank1:Checking"),
        open(d, "Assets:US:Bank1:Savings"),
        open(d, "Assets:US:Bank2:Checking"),
        open(d, "Assets:US:Bank2:Savings"),
        open(d, "Equity:Opening-Balances"),
        Directive::Transaction(
            Transaction::new(date(2013, 5, 10), "")
                .with_posting(Posting::new("Assets:US:Bank1:Checking", Amount::new(dec!(1.00), "USD")))
                .with_posting(Posting::new("Assets:US:Bank1:Savings", Amount::new(dec!(2.00), "USD")))
                .with_posting(Posting::new("Assets:US:Bank2:Checking", Amount::new(dec!(3.00), "USD")))
                .with_posting(Posting::new("Assets:US:Bank2:Savings", Amount::new(dec!(4.00), "USD")))
                .with_posting(Posting::new("Equity:Opening-Balances", Amount::new(dec!(-10.00), "USD"))),
        ),
        pad(date(2013, 5, 20), "Assets:US", "Equity:Opening-Balances"),
        balance(date(2013, 6, 1), "Assets:US", dec!(100.00), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);

    // One correction, posted to the parent alone.
    let txn = &result.padding_transactions[0];
    assert_eq!(txn.postings.len(), 2);
    assert_eq!(txn.postings[0].account, "Assets:US");
    assert_eq!(txn.postings[0].units, Amount::new(dec!(90.00), "USD"));
    assert_eq!(
        txn.narration,
        "(Padding inserted for Balance of 100.00 USD for difference 90.00 USD)"
    );
}

#[test]
fn test_child_padding_seen_by_parent_balance() {
    let directives = vec![
        pad(date(2013, 5, 1), "Assets:US:Checking", "Equity:Opening"),
        transfer(date(2013, 5, 2), "Assets:US:Savings", "Income:Job", dec!(5), "USD"),
        balance(date(2013, 5, 3), "Assets:US:Checking", dec!(20), "USD"),
        balance(date(2013, 5, 3), "Assets:US", dec!(25), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);
    assert_eq!(result.padding_transactions.len(), 1);
}

#[test]
fn test_pad_multiple_currencies() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        open(date(2013, 5, 1), "Equity:Opening-Balances"),
        Directive::Transaction(
            Transaction::new(date(2013, 5, 10), "")
                .with_posting(Posting::new("Assets:Checking", Amount::new(dec!(1.00), "USD")))
                .with_posting(Posting::new("Assets:Checking", Amount::new(dec!(1.00), "CAD")))
                .with_posting(Posting::new("Assets:Checking", Amount::new(dec!(1.00), "EUR")))
                .with_posting(Posting::new("Equity:Opening-Balances", Amount::new(dec!(-1.00), "USD")))
                .with_posting(Posting::new("Equity:Opening-Balances", Amount::new(dec!(-1.00), "CAD")))
                .with_posting(Posting::new("Equity:Opening-Balances", Amount::new(dec!(-1.00), "EUR"))),
        ),
        pad(date(2013, 5, 20), "Assets:Checking", "Equity:Opening-Balances"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(5.00), "USD"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(3.00), "CAD"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(1.00), "EUR"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);

    let narrations: Vec<&str> = result
        .padding_transactions
        .iter()
        .map(|t| t.narration.as_str())
        .collect();
    assert_eq!(
        narrations,
        vec![
            "(Padding inserted for Balance of 5.00 USD for difference 4.00 USD)",
            "(Padding inserted for Balance of 3.00 CAD for difference 2.00 CAD)",
        ]
    );
    assert!(result
        .padding_transactions
        .iter()
        .all(|t| t.date == date(2013, 5, 20)));

    // Both follow the pad, in creation order.
    assert!(matches!(result.directives[3], Directive::Pad(_)));
    assert_eq!(result.directives[4].as_transaction(), Some(&result.padding_transactions[0]));
    assert_eq!(result.directives[5].as_transaction(), Some(&result.padding_transactions[1]));
}

// ============================================================================
// Lots held at cost
// ============================================================================

#[test]
fn test_pad_at_cost() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Investments"),
        open(date(2013, 5, 1), "Equity:Opening-Balances"),
        Directive::Transaction(
            Transaction::new(date(2013, 5, 15), "")
                .with_posting(
                    Posting::new("Assets:Investments", Amount::new(dec!(10), "MSFT"))
                        .with_cost(Cost::new(dec!(54.30), "USD")),
                )
                .with_posting(Posting::new("Equity:Opening-Balances", Amount::new(dec!(-543.00), "USD"))),
        ),
        pad(date(2013, 6, 1), "Assets:Investments", "Equity:Opening-Balances"),
        balance(date(2013, 10, 1), "Assets:Investments", dec!(12), "MSFT"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::PadWithCost]);
    assert!(result.errors[0]
        .message
        .contains("Attempt to pad an entry with cost for"));
    assert_eq!(result.errors[0].entry, 3);
    assert!(result.padding_transactions.is_empty());
}

#[test]
fn test_cost_refusal_is_per_currency() {
    let directives = vec![
        Directive::Transaction(
            Transaction::new(date(2013, 5, 15), "")
                .with_posting(
                    Posting::new("Assets:Investments", Amount::new(dec!(10), "MSFT"))
                        .with_cost(Cost::new(dec!(54.30), "USD")),
                )
                .with_posting(Posting::new("Assets:Investments", Amount::new(dec!(-543.00), "USD"))),
        ),
        pad(date(2013, 6, 1), "Assets:Investments", "Equity:Opening"),
        balance(date(2013, 10, 1), "Assets:Investments", dec!(12), "MSFT"),
        balance(date(2013, 10, 1), "Assets:Investments", dec!(0.00), "USD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::PadWithCost]);
    assert_eq!(
        padding_summary(&result),
        vec![(date(2013, 6, 1), "Assets:Investments".to_string(), Amount::new(dec!(543.00), "USD"))]
    );
}

#[test]
fn test_cost_shortfall_without_pad_is_balance_error() {
    let directives = vec![
        Directive::Transaction(
            Transaction::new(date(2013, 5, 15), "")
                .with_posting(
                    Posting::new("Assets:Investments", Amount::new(dec!(10), "MSFT"))
                        .with_cost(Cost::new(dec!(54.30), "USD")),
                )
                .with_posting(Posting::new("Equity:Opening", Amount::new(dec!(-543.00), "USD"))),
        ),
        balance(date(2013, 10, 1), "Assets:Investments", dec!(12), "MSFT"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::BalanceAssertionFailed]);
}

#[test]
fn test_negative_lot_at_cost_is_not_a_diagnostic() {
    let lot = Cost::new(dec!(54.30), "USD");
    let directives = vec![
        Directive::Transaction(
            Transaction::new(date(2013, 5, 15), "")
                .with_posting(Posting::new("Assets:Investments", Amount::new(dec!(-5), "MSFT")).with_cost(lot))
                .with_posting(Posting::new("Assets:Cash", Amount::new(dec!(271.50), "USD"))),
        ),
        balance(date(2013, 10, 1), "Assets:Investments", dec!(-5), "MSFT"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);
}

// ============================================================================
// Same-date ordering
// ============================================================================

#[test]
fn test_balance_is_checked_before_same_day_pad() {
    let d = date(2013, 5, 1);
    let mut directives = vec![
        pad(d, "Assets:Checking", "Equity:Opening"),
        balance(d, "Assets:Checking", dec!(10), "USD"),
    ];
    sort_directives(&mut directives);

    let result = process_pads(&directives);
    assert_eq!(
        codes(&result),
        vec![ErrorCode::BalanceAssertionFailed, ErrorCode::UnusedPad]
    );
    assert!(result.padding_transactions.is_empty());
}

#[test]
fn test_balance_ignores_same_day_postings() {
    let d = date(2013, 5, 3);
    let directives = vec![
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening"),
        balance(d, "Assets:Checking", dec!(50), "USD"),
        transfer(d, "Assets:Checking", "Income:Job", dec!(30), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);
    assert_eq!(padding_summary(&result)[0].2, Amount::new(dec!(50), "USD"));
}

#[test]
fn test_same_day_pad_and_posting_keep_authoring_order() {
    let d = date(2013, 5, 1);
    let directives = vec![
        transfer(d, "Assets:Checking", "Income:Job", dec!(30), "USD"),
        pad(d, "Assets:Checking", "Equity:Opening"),
        transfer(d, "Assets:Checking", "Income:Job", dec!(5), "USD"),
        balance(date(2013, 5, 2), "Assets:Checking", dec!(100), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty());
    assert_eq!(padding_summary(&result)[0].2, Amount::new(dec!(65), "USD"));
    assert!(result.directives[2].as_transaction().is_some_and(Transaction::is_padding));
}

#[test]
fn test_walk_running_balance_matches_padding() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening"),
        transfer(date(2013, 5, 3), "Assets:Checking", "Assets:Cash", dec!(10), "USD"),
        balance(date(2013, 5, 10), "Assets:Checking", dec!(105), "USD"),
        transfer(date(2013, 5, 15), "Assets:Checking", "Assets:Cash", dec!(20), "USD"),
        transfer(date(2013, 5, 16), "Assets:Checking", "Assets:Cash", dec!(20), "USD"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(145), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);

    let mut running = Decimal::ZERO;
    let mut trace = Vec::new();
    for item in walk_account(&result.directives, "Assets:Checking") {
        let kind = match item {
            WalkItem::Open { .. } => "open",
            WalkItem::Pad { .. } => "pad",
            WalkItem::Balance { .. } => "balance",
            WalkItem::Posting { posting, .. } => {
                running += posting.units.number;
                "posting"
            }
        };
        trace.push((kind, running));
    }
    assert_eq!(
        trace,
        vec![
            ("open", dec!(0)),
            ("pad", dec!(0)),
            ("posting", dec!(95)),
            ("posting", dec!(105)),
            ("balance", dec!(105)),
            ("posting", dec!(125)),
            ("posting", dec!(145)),
            ("balance", dec!(145)),
        ]
    );
}

// ============================================================================
// Tolerances
// ============================================================================

#[test]
fn test_explicit_tolerance_passes_small_difference() {
    let directives = vec![
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening"),
        transfer(date(2013, 5, 2), "Assets:Checking", "Income:Job", dec!(99.99), "USD"),
        Directive::Balance(
            Balance::new(date(2013, 5, 3), "Assets:Checking", Amount::new(dec!(100.00), "USD"))
                .with_tolerance(dec!(0.01)),
        ),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::UnusedPad]);
}

#[test]
fn test_default_tolerance_from_options() {
    let directives = vec![
        transfer(date(2013, 5, 2), "Assets:Checking", "Income:Job", dec!(99.996), "USD"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(100.00), "USD"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(0.001), "CAD"),
    ];

    assert_eq!(
        codes(&process_pads(&directives)),
        vec![ErrorCode::BalanceAssertionFailed, ErrorCode::BalanceAssertionFailed]
    );

    let mut options = Options::new();
    options.set("inferred_tolerance_default", "USD:0.005");
    assert_eq!(
        codes(&process_pads_with_options(&directives, &options)),
        vec![ErrorCode::BalanceAssertionFailed]
    );

    options.set("inferred_tolerance_default", "*:0.01");
    assert!(process_pads_with_options(&directives, &options).errors.is_empty());
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_rerun_on_output_is_stable() {
    let directives = vec![
        open(date(2013, 5, 1), "Assets:Checking"),
        open(date(2013, 5, 1), "Equity:Opening-Balances"),
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening-Balances"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(172.45), "USD"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(3.00), "CAD"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(0), "EUR"),
        transfer(date(2013, 5, 15), "Assets:Checking", "Income:Job", dec!(20.00), "USD"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(192.45), "USD"),
        pad(date(2013, 6, 2), "Assets:Checking", "Equity:Opening-Balances"),
        balance(date(2013, 7, 1), "Assets:Checking", dec!(200.00), "USD"),
        balance(date(2013, 7, 1), "Equity:Opening-Balances", dec!(-180.00), "USD"),
    ];

    let first = process_pads(&directives);
    assert!(first.errors.is_empty(), "unexpected: {:?}", first.errors);
    assert_eq!(first.padding_transactions.len(), 3);

    let second = process_pads(&first.directives);
    assert!(second.errors.is_empty(), "unexpected: {:?}", second.errors);
    assert!(second.padding_transactions.is_empty());
    assert_eq!(second.directives, first.directives);
}

#[test]
fn test_rerun_keeps_consumed_pad_spent() {
    let directives = vec![
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(10), "USD"),
        balance(date(2013, 6, 1), "Assets:Checking", dec!(5), "CAD"),
    ];

    let first = process_pads(&directives);
    assert_eq!(codes(&first), vec![ErrorCode::BalanceAssertionFailed]);

    let second = process_pads(&first.directives);
    assert_eq!(codes(&second), vec![ErrorCode::BalanceAssertionFailed]);
    assert!(second.padding_transactions.is_empty());
}

// ============================================================================
// Pad sources
// ============================================================================

#[test]
fn test_source_balance_sees_padding() {
    let directives = vec![
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(100), "USD"),
        balance(date(2013, 5, 4), "Equity:Opening", dec!(-100), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);
}

#[test]
fn test_errors_on_one_account_do_not_affect_another() {
    let directives = vec![
        balance(date(2013, 5, 1), "Assets:Broken", dec!(1), "USD"),
        pad(date(2013, 5, 1), "Assets:Checking", "Equity:Opening"),
        balance(date(2013, 5, 3), "Assets:Checking", dec!(100), "USD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::BalanceAssertionFailed]);
    assert_eq!(result.errors[0].account, "Assets:Broken");
    assert_eq!(result.padding_transactions.len(), 1);
}

// ============================================================================
// Closed sub-accounts
// ============================================================================

#[test]
fn test_parent_balance_skips_descendants_closed_before_it() {
    let directives = vec![
        open(date(2013, 1, 1), "Assets:Bank"),
        open(date(2013, 1, 1), "Assets:Bank:Old"),
        transfer(date(2013, 2, 1), "Assets:Bank:Old", "Equity:Opening", dec!(100), "USD"),
        balance(date(2013, 5, 15), "Assets:Bank", dec!(100), "USD"),
        Directive::Close(Close::new(date(2013, 6, 1), "Assets:Bank:Old")),
        balance(date(2013, 6, 1), "Assets:Bank", dec!(100), "USD"),
        pad(date(2013, 6, 10), "Assets:Bank", "Equity:Opening"),
        balance(date(2013, 7, 1), "Assets:Bank", dec!(50), "USD"),
    ];

    let result = process_pads(&directives);
    assert!(result.errors.is_empty(), "unexpected: {:?}", result.errors);
    assert_eq!(
        padding_summary(&result),
        vec![(date(2013, 6, 10), "Assets:Bank".to_string(), Amount::new(dec!(50), "USD"))]
    );
}

// ============================================================================
// Out-of-range amounts
// ============================================================================

#[test]
fn test_difference_too_large_is_balance_error() {
    let directives = vec![
        open(date(2013, 1, 1), "Assets:A"),
        open(date(2013, 1, 1), "Assets:B"),
        transfer(date(2013, 1, 2), "Assets:A", "Equity:E", dec!(-1), "USD"),
        pad(date(2013, 1, 3), "Assets:A", "Equity:E"),
        pad(date(2013, 1, 3), "Assets:B", "Equity:E"),
        balance(date(2013, 1, 4), "Assets:A", Decimal::MAX, "USD"),
        balance(date(2013, 1, 4), "Assets:B", dec!(10), "USD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::UnusedPad, ErrorCode::BalanceAssertionFailed]);
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.errors[0].account, "Assets:A");

    let err = &result.errors[1];
    assert_eq!(err.account, "Assets:A");
    assert_eq!(err.entry, 5);
    assert!(err.message.contains("out of range"), "{}", err.message);

    // The other account still pads.
    assert_eq!(
        padding_summary(&result),
        vec![(date(2013, 1, 3), "Assets:B".to_string(), Amount::new(dec!(10), "USD"))]
    );
}

#[test]
fn test_holdings_too_large_is_balance_error() {
    let directives = vec![
        transfer(date(2013, 1, 2), "Assets:A", "Equity:E", Decimal::MAX, "USD"),
        transfer(date(2013, 1, 3), "Assets:A", "Equity:E", Decimal::MAX, "USD"),
        balance(date(2013, 1, 4), "Assets:A", dec!(1), "USD"),
        balance(date(2013, 1, 4), "Assets:A", dec!(0), "CAD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::BalanceAssertionFailed]);
    assert_eq!(result.errors[0].entry, 2);
    assert!(result.errors[0].message.contains("holdings of USD are out of range"));
}

#[test]
fn test_family_total_too_large_is_balance_error() {
    let directives = vec![
        transfer(date(2013, 1, 2), "Assets:A", "Equity:E", Decimal::MAX, "USD"),
        transfer(date(2013, 1, 2), "Assets:A:B", "Equity:F", dec!(5), "USD"),
        balance(date(2013, 1, 4), "Assets:A:B", dec!(5), "USD"),
        balance(date(2013, 1, 4), "Assets:A", dec!(5), "USD"),
    ];

    let result = process_pads(&directives);
    assert_eq!(codes(&result), vec![ErrorCode::BalanceAssertionFailed]);
    assert_eq!(result.errors[0].account, "Assets:A");
    assert_eq!(result.errors[0].entry, 3);
}
