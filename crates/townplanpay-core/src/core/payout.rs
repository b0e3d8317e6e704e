// crates/townplanpay-core/src/core/payout.rs
// ============================================================================
// Module: TownPlanPay Payout Model
// Description: Simulated payout requests, receipts, balances, and reports.
// Purpose: Define the ledger data exchanged with hosts.
// Dependencies: crate::core::{identifiers, stage, time}, serde
// ============================================================================

//! ## Overview
//! Payouts are simulated: a receipt records that an amount was debited from
//! an in-memory balance. Identifiers and timestamps on receipts come from the
//! caller through [`PayoutContext`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ProjectId;
use crate::core::identifiers::TransactionId;
use crate::core::stage::MilestoneStage;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Request to pay a contractor for a milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRequest {
    /// Project being paid against.
    pub project_id: ProjectId,
    /// Milestone label (usually a stage id).
    pub milestone: String,
    /// Amount to debit.
    pub amount: f64,
    /// Contractor wallet or name.
    #[serde(default)]
    pub contractor: String,
    /// Evaluator confidence attached to the payout, in `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
}

/// Host-supplied identity for a payout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutContext {
    /// Transaction identifier to stamp on the receipt.
    pub tx_id: TransactionId,
    /// Time the payout is recorded.
    pub recorded_at: Timestamp,
}

// ============================================================================
// SECTION: Receipts
// ============================================================================

/// Payout status. Simulated payouts complete immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    /// Funds were debited.
    Completed,
}

/// Recorded payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutReceipt {
    /// Transaction identifier.
    pub tx_id: TransactionId,
    /// Project paid against.
    pub project_id: ProjectId,
    /// Milestone label.
    pub milestone: String,
    /// Debited amount.
    pub amount: f64,
    /// Contractor wallet or name.
    pub contractor: String,
    /// Payout status.
    pub status: PayoutStatus,
    /// Time the payout was recorded.
    pub recorded_at: Timestamp,
    /// Ledger currency code.
    pub currency: String,
    /// Evaluator confidence attached to the payout.
    pub confidence: f64,
}

/// Result of a recorded payout.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutOutcome {
    /// Receipt appended to the ledger.
    pub receipt: PayoutReceipt,
    /// Available funds right after this debit, rounded to cents.
    pub balance_after: f64,
}

/// Available ledger balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Available funds rounded to cents.
    pub available: f64,
    /// Ledger currency code.
    pub currency: String,
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Aggregate view of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Number of recorded payouts.
    pub transaction_count: usize,
    /// Sum of recorded payout amounts, rounded to cents.
    pub total_paid: f64,
    /// Rounded mean of per-payout confidence percentages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_confidence_pct: Option<f64>,
    /// Available funds rounded to cents.
    pub available: f64,
    /// Ledger currency code.
    pub currency: String,
}

/// Progress of a single stage within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    /// Stage.
    pub stage: MilestoneStage,
    /// Stage label.
    pub label: String,
    /// Stage display order.
    pub order: u8,
    /// Whether a payout has been recorded for the stage.
    pub completed: bool,
    /// Transaction that completed the stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<TransactionId>,
    /// Amount paid for the stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// Stage-by-stage status of one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatus {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Per-stage progress in display order.
    pub stages: Vec<StageProgress>,
    /// Number of completed stages.
    pub completed_stages: usize,
    /// Number of catalog stages.
    pub total_stages: usize,
    /// Rounded completion percentage.
    pub progress_pct: f64,
    /// Sum of the project's payout amounts, rounded to cents.
    pub total_paid: f64,
}
