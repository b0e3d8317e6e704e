// crates/townplanpay-core/src/core/mod.rs
// ============================================================================
// Module: TownPlanPay Core Types
// Description: Evidence, decision, stage, and payout data model.
// Purpose: Group the serializable types shared by the runtime and hosts.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types are plain data. Numeric coercion of raw evidence lives in
//! [`coercion`]; scoring lives in [`crate::runtime`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod coercion;
pub mod decision;
pub mod evidence;
pub mod identifiers;
pub mod number;
pub mod payout;
pub mod stage;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use decision::Decision;
pub use decision::MilestoneDecision;
pub use evidence::CoercionMode;
pub use evidence::EvidenceError;
pub use evidence::EvidenceField;
pub use evidence::MilestoneEvidence;
pub use evidence::SubmissionMetadata;
pub use identifiers::ProjectId;
pub use identifiers::TransactionId;
pub use payout::Balance;
pub use payout::LedgerSummary;
pub use payout::PayoutContext;
pub use payout::PayoutOutcome;
pub use payout::PayoutReceipt;
pub use payout::PayoutRequest;
pub use payout::PayoutStatus;
pub use payout::ProjectStatus;
pub use payout::StageProgress;
pub use stage::MilestoneStage;
pub use time::Timestamp;
