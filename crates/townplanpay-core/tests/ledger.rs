// crates/townplanpay-core/tests/ledger.rs
// ============================================================================
// Module: Payment Ledger Tests
// Description: Payout recording, balance tracking, and request validation.
// Purpose: Ensure the in-memory ledger never overdraws or records bad payouts.
// Dependencies: townplanpay-core
// ============================================================================
//! ## Overview
//! Exercises [`InMemoryPaymentLedger`] directly and through
//! [`SharedPaymentLedger`].

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::float_cmp,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::thread;

use townplanpay_core::InMemoryPaymentLedger;
use townplanpay_core::LedgerError;
use townplanpay_core::PaymentLedger;
use townplanpay_core::PayoutContext;
use townplanpay_core::PayoutRequest;
use townplanpay_core::PayoutStatus;
use townplanpay_core::ProjectId;
use townplanpay_core::SharedPaymentLedger;
use townplanpay_core::Timestamp;
use townplanpay_core::TransactionId;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn request(project: &str, milestone: &str, amount: f64) -> PayoutRequest {
    PayoutRequest {
        project_id: ProjectId::new(project),
        milestone: milestone.to_string(),
        amount,
        contractor: "0xC0FFEE".to_string(),
        confidence: 0.75,
    }
}

fn context(tx: &str, at: u64) -> PayoutContext {
    PayoutContext {
        tx_id: TransactionId::new(tx),
        recorded_at: Timestamp::Logical(at),
    }
}

// ============================================================================
// SECTION: Recording
// ============================================================================

/// Verifies a payout debits the balance and returns a completed receipt.
#[test]
fn payout_debits_balance() {
    let ledger = InMemoryPaymentLedger::default();
    let outcome = ledger
        .pay_milestone(&request("main-street", "foundation", 450.0), context("mock_tx_0001", 1))
        .expect("payout");
    assert_eq!(outcome.balance_after, 49_550.0);
    let receipt = outcome.receipt;
    assert_eq!(receipt.status, PayoutStatus::Completed);
    assert_eq!(receipt.currency, "USDC");
    assert_eq!(receipt.tx_id.as_str(), "mock_tx_0001");
    assert_eq!(receipt.recorded_at, Timestamp::Logical(1));

    let balance = ledger.balance().expect("balance");
    assert_eq!(balance.available, 49_550.0);
    assert_eq!(balance.currency, "USDC");
}

/// Verifies transactions list newest first and filter by project.
#[test]
fn transactions_are_newest_first() {
    let ledger = InMemoryPaymentLedger::new(10_000.0, "USDC");
    ledger.pay_milestone(&request("a", "site_prep", 100.0), context("tx-1", 1)).expect("first");
    ledger.pay_milestone(&request("b", "site_prep", 200.0), context("tx-2", 2)).expect("second");
    ledger.pay_milestone(&request("a", "foundation", 300.0), context("tx-3", 3)).expect("third");

    let all: Vec<String> = ledger
        .transactions(None)
        .expect("all")
        .into_iter()
        .map(|receipt| receipt.tx_id.to_string())
        .collect();
    assert_eq!(all, vec!["tx-3", "tx-2", "tx-1"]);

    let project_a = ledger.transactions(Some(&ProjectId::new("a"))).expect("project a");
    assert_eq!(project_a.len(), 2);
    assert_eq!(project_a[0].milestone, "foundation");
    assert!(ledger.transactions(Some(&ProjectId::new("missing"))).expect("none").is_empty());
}

/// Verifies balances are reported rounded to cents.
#[test]
fn balance_rounds_to_cents() {
    let ledger = InMemoryPaymentLedger::new(100.0, "USDC");
    ledger.pay_milestone(&request("a", "paving", 0.1), context("tx-1", 1)).expect("first");
    ledger.pay_milestone(&request("a", "paving", 0.2), context("tx-2", 2)).expect("second");
    assert_eq!(ledger.balance().expect("balance").available, 99.7);
}

// ============================================================================
// SECTION: Rejections
// ============================================================================

/// Verifies overdrafts are refused and leave the ledger untouched.
#[test]
fn insufficient_funds_is_refused() {
    let ledger = InMemoryPaymentLedger::new(500.0, "USDC");
    let error = ledger
        .pay_milestone(&request("a", "structural", 500.01), context("tx-1", 1))
        .unwrap_err();
    assert_eq!(
        error,
        LedgerError::InsufficientFunds {
            requested: 500.01,
            available: 500.0,
        }
    );
    assert_eq!(ledger.balance().expect("balance").available, 500.0);
    assert!(ledger.transactions(None).expect("transactions").is_empty());

    ledger.pay_milestone(&request("a", "structural", 500.0), context("tx-2", 2)).expect("exact");
    assert_eq!(ledger.balance().expect("balance").available, 0.0);
}

/// Verifies malformed payout requests are rejected.
#[test]
fn invalid_requests_are_rejected() {
    let ledger = InMemoryPaymentLedger::default();
    let mut blank_project = request("a", "paving", 10.0);
    blank_project.project_id = ProjectId::new("  ");
    let mut bad_confidence = request("a", "paving", 10.0);
    bad_confidence.confidence = f64::NAN;

    let cases = [
        blank_project,
        request("a", " ", 10.0),
        request("a", "paving", 0.0),
        request("a", "paving", -5.0),
        request("a", "paving", f64::INFINITY),
        request("a", "paving", f64::NAN),
        bad_confidence,
    ];
    for (index, case) in cases.iter().enumerate() {
        let error = ledger.pay_milestone(case, context(&format!("tx-{index}"), 1)).unwrap_err();
        assert!(matches!(error, LedgerError::InvalidRequest(_)), "case {index}: {error}");
    }
    assert_eq!(ledger.balance().expect("balance").available, 50_000.0);
}

/// Verifies transaction ids must be unique.
#[test]
fn duplicate_transaction_id_is_rejected() {
    let ledger = InMemoryPaymentLedger::default();
    ledger.pay_milestone(&request("a", "paving", 10.0), context("tx-1", 1)).expect("first");
    let error =
        ledger.pay_milestone(&request("a", "paving", 10.0), context("tx-1", 2)).unwrap_err();
    assert!(matches!(error, LedgerError::InvalidRequest(_)));
    assert_eq!(ledger.transactions(None).expect("transactions").len(), 1);
}

// ============================================================================
// SECTION: Sharing
// ============================================================================

/// Verifies concurrent payouts through a shared ledger never overdraw.
#[test]
fn concurrent_payouts_never_overdraw() {
    let ledger = SharedPaymentLedger::from_ledger(InMemoryPaymentLedger::new(1_000.0, "USDC"));
    let handles: Vec<_> = (0 .. 20)
        .map(|index| {
            let ledger = ledger.clone();
            thread::spawn(move || {
                ledger
                    .pay_milestone(
                        &request("a", "materials", 100.0),
                        context(&format!("tx-{index}"), index),
                    )
                    .is_ok()
            })
        })
        .collect();
    let successes = handles.into_iter().map(|handle| handle.join().expect("join"));
    assert_eq!(successes.filter(|ok| *ok).count(), 10);
    assert_eq!(ledger.balance().expect("balance").available, 0.0);
    assert_eq!(ledger.transactions(None).expect("transactions").len(), 10);
}

/// Verifies each payout reports the balance left by its own debit.
#[test]
fn concurrent_payouts_report_their_own_balance() {
    let ledger = SharedPaymentLedger::from_ledger(InMemoryPaymentLedger::new(2_000.0, "USDC"));
    let handles: Vec<_> = (0 .. 20)
        .map(|index| {
            let ledger = ledger.clone();
            thread::spawn(move || {
                ledger
                    .pay_milestone(
                        &request("a", "materials", 100.0),
                        context(&format!("tx-{index}"), index),
                    )
                    .expect("payout")
                    .balance_after
            })
        })
        .collect();
    let mut balances: Vec<f64> =
        handles.into_iter().map(|handle| handle.join().expect("join")).collect();
    balances.sort_by(f64::total_cmp);
    let expected: Vec<f64> = (0 .. 20).map(|step| f64::from(step) * 100.0).collect();
    assert_eq!(balances, expected);
}
