// crates/townplanpay-core/src/runtime/ledger.rs
// ============================================================================
// Module: TownPlanPay In-Memory Ledger
// Description: Simulated payout ledger held in process memory.
// Purpose: Record approved milestone payouts without settlement or persistence.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryPaymentLedger`] keeps a balance and an append-only receipt list
//! behind a mutex. Nothing is persisted; a restart resets the ledger to its
//! starting balance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use crate::core::identifiers::ProjectId;
use crate::core::number::round_to_cents;
use crate::core::payout::Balance;
use crate::core::payout::PayoutContext;
use crate::core::payout::PayoutOutcome;
use crate::core::payout::PayoutReceipt;
use crate::core::payout::PayoutRequest;
use crate::core::payout::PayoutStatus;
use crate::interfaces::LedgerError;
use crate::interfaces::PaymentLedger;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Starting balance of a fresh ledger.
pub const DEFAULT_STARTING_BALANCE: f64 = 50_000.0;
/// Currency code of a fresh ledger.
pub const DEFAULT_CURRENCY: &str = "USDC";

// ============================================================================
// SECTION: In-Memory Ledger
// ============================================================================

/// Mutable ledger state.
#[derive(Debug)]
struct LedgerState {
    /// Available funds (unrounded).
    balance: f64,
    /// Receipts in recording order.
    receipts: Vec<PayoutReceipt>,
}

/// In-memory payout ledger.
#[derive(Debug, Clone)]
pub struct InMemoryPaymentLedger {
    /// Ledger state protected by a mutex.
    state: Arc<Mutex<LedgerState>>,
    /// Currency code stamped on receipts.
    currency: String,
}

impl Default for InMemoryPaymentLedger {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_BALANCE, DEFAULT_CURRENCY)
    }
}

impl InMemoryPaymentLedger {
    /// Creates a ledger with the given starting balance and currency.
    #[must_use]
    pub fn new(starting_balance: f64, currency: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                balance: starting_balance,
                receipts: Vec::new(),
            })),
            currency: currency.into(),
        }
    }

    /// Returns the ledger currency code.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl PaymentLedger for InMemoryPaymentLedger {
    fn pay_milestone(
        &self,
        request: &PayoutRequest,
        context: PayoutContext,
    ) -> Result<PayoutOutcome, LedgerError> {
        validate_request(request)?;
        let mut guard = self
            .state
            .lock()
            .map_err(|_| LedgerError::Store("ledger mutex poisoned".to_string()))?;
        if request.amount > guard.balance {
            return Err(LedgerError::InsufficientFunds {
                requested: request.amount,
                available: round_to_cents(guard.balance),
            });
        }
        if guard.receipts.iter().any(|receipt| receipt.tx_id == context.tx_id) {
            return Err(LedgerError::InvalidRequest(format!(
                "duplicate transaction id {}",
                context.tx_id
            )));
        }
        let receipt = PayoutReceipt {
            tx_id: context.tx_id,
            project_id: request.project_id.clone(),
            milestone: request.milestone.clone(),
            amount: request.amount,
            contractor: request.contractor.clone(),
            status: PayoutStatus::Completed,
            recorded_at: context.recorded_at,
            currency: self.currency.clone(),
            confidence: request.confidence,
        };
        guard.balance -= request.amount;
        guard.receipts.push(receipt.clone());
        let balance_after = round_to_cents(guard.balance);
        drop(guard);
        Ok(PayoutOutcome {
            receipt,
            balance_after,
        })
    }

    fn balance(&self) -> Result<Balance, LedgerError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| LedgerError::Store("ledger mutex poisoned".to_string()))?;
        Ok(Balance {
            available: round_to_cents(guard.balance),
            currency: self.currency.clone(),
        })
    }

    fn transactions(
        &self,
        project_id: Option<&ProjectId>,
    ) -> Result<Vec<PayoutReceipt>, LedgerError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| LedgerError::Store("ledger mutex poisoned".to_string()))?;
        Ok(guard
            .receipts
            .iter()
            .rev()
            .filter(|receipt| project_id.is_none_or(|id| receipt.project_id == *id))
            .cloned()
            .collect())
    }
}

/// Rejects payouts that cannot be recorded meaningfully.
fn validate_request(request: &PayoutRequest) -> Result<(), LedgerError> {
    if request.project_id.as_str().trim().is_empty() {
        return Err(LedgerError::InvalidRequest("project_id must be non-empty".to_string()));
    }
    if request.milestone.trim().is_empty() {
        return Err(LedgerError::InvalidRequest("milestone must be non-empty".to_string()));
    }
    if !request.amount.is_finite() || request.amount <= 0.0 {
        return Err(LedgerError::InvalidRequest(
            "amount must be a positive finite number".to_string(),
        ));
    }
    if !request.confidence.is_finite() {
        return Err(LedgerError::InvalidRequest("confidence must be finite".to_string()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Shared Ledger
// ============================================================================

/// Shared payout ledger backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedPaymentLedger {
    /// Inner ledger implementation.
    inner: Arc<dyn PaymentLedger + Send + Sync>,
}

impl SharedPaymentLedger {
    /// Wraps a ledger in a shared, clonable wrapper.
    #[must_use]
    pub fn from_ledger(ledger: impl PaymentLedger + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(ledger),
        }
    }
}

impl PaymentLedger for SharedPaymentLedger {
    fn pay_milestone(
        &self,
        request: &PayoutRequest,
        context: PayoutContext,
    ) -> Result<PayoutOutcome, LedgerError> {
        self.inner.pay_milestone(request, context)
    }

    fn balance(&self) -> Result<Balance, LedgerError> {
        self.inner.balance()
    }

    fn transactions(
        &self,
        project_id: Option<&ProjectId>,
    ) -> Result<Vec<PayoutReceipt>, LedgerError> {
        self.inner.transactions(project_id)
    }
}
