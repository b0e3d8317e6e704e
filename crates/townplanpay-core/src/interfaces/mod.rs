// crates/townplanpay-core/src/interfaces/mod.rs
// ============================================================================
// Module: TownPlanPay Interfaces
// Description: Backend-agnostic payout ledger interface.
// Purpose: Define the contract surface hosts use to record payouts.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The [`PaymentLedger`] trait decouples hosts from the ledger backend. The
//! only backend shipped is the in-memory simulation in
//! [`crate::runtime::InMemoryPaymentLedger`]. Implementations must leave
//! state untouched when a payout is rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::ProjectId;
use crate::core::payout::Balance;
use crate::core::payout::PayoutContext;
use crate::core::payout::PayoutOutcome;
use crate::core::payout::PayoutReceipt;
use crate::core::payout::PayoutRequest;

// ============================================================================
// SECTION: Payment Ledger
// ============================================================================

/// Payment ledger errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Requested amount exceeds the available balance.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Requested payout amount.
        requested: f64,
        /// Available balance, rounded to cents.
        available: f64,
    },
    /// Payout request failed validation.
    #[error("invalid payout request: {0}")]
    InvalidRequest(String),
    /// Ledger storage failure.
    #[error("ledger store error: {0}")]
    Store(String),
}

/// Ledger that records simulated milestone payouts.
pub trait PaymentLedger {
    /// Debits the ledger and records a receipt.
    ///
    /// The returned balance is read in the same step as the debit, so it
    /// reflects exactly this payout even when others run concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the request is invalid, funds are
    /// insufficient, or the store fails. No state changes on error.
    fn pay_milestone(
        &self,
        request: &PayoutRequest,
        context: PayoutContext,
    ) -> Result<PayoutOutcome, LedgerError>;

    /// Returns the available balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] when the store fails.
    fn balance(&self) -> Result<Balance, LedgerError>;

    /// Returns recorded receipts, newest first, optionally filtered by project.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] when the store fails.
    fn transactions(&self, project_id: Option<&ProjectId>)
    -> Result<Vec<PayoutReceipt>, LedgerError>;
}
