// crates/townplanpay-core/src/lib.rs
// ============================================================================
// Module: TownPlanPay Core Library
// Description: Public API surface for the TownPlanPay core.
// Purpose: Expose evidence, decision, and ledger types plus runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! TownPlanPay core scores contractor milestone evidence with a fixed weighted
//! heuristic and proposes a payment decision. It also models a simulated
//! payout ledger so hosts can record approved payments in memory. The core
//! never reads clocks, randomness, or the network; hosts supply identifiers
//! and timestamps explicitly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::LedgerError;
pub use interfaces::PaymentLedger;
pub use runtime::APPROVAL_THRESHOLD;
pub use runtime::DEFAULT_STARTING_BALANCE;
pub use runtime::InMemoryPaymentLedger;
pub use runtime::SharedPaymentLedger;
pub use runtime::composite_score;
pub use runtime::evaluate_milestone;
pub use runtime::project_status;
pub use runtime::summarize_ledger;
