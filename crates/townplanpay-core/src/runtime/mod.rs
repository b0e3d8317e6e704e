// crates/townplanpay-core/src/runtime/mod.rs
// ============================================================================
// Module: TownPlanPay Runtime
// Description: Evaluator, in-memory ledger, and ledger reporting.
// Purpose: Implement the behavior behind the core data model.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime hosts the pure milestone evaluator and the simulated payout
//! ledger. Reporting helpers derive summaries from receipts without touching
//! ledger state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod evaluator;
pub mod ledger;
pub mod status;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use evaluator::APPROVAL_THRESHOLD;
pub use evaluator::IMAGE_WEIGHT;
pub use evaluator::INSPECTOR_WEIGHT;
pub use evaluator::PROGRESS_WEIGHT;
pub use evaluator::composite_score;
pub use evaluator::evaluate_milestone;
pub use ledger::DEFAULT_CURRENCY;
pub use ledger::DEFAULT_STARTING_BALANCE;
pub use ledger::InMemoryPaymentLedger;
pub use ledger::SharedPaymentLedger;
pub use status::project_status;
pub use status::summarize_ledger;
