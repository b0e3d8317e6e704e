// crates/townplanpay-core/src/runtime/status.rs
// ============================================================================
// Module: TownPlanPay Ledger Reporting
// Description: Summaries and per-project stage status derived from receipts.
// Purpose: Back the transaction-history and project-status views.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Reports are computed from receipt slices in the order the ledger returns
//! them (newest first). Amount totals round to cents; percentages round half
//! toward positive infinity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identifiers::ProjectId;
use crate::core::number::round_half_up;
use crate::core::number::round_to_cents;
use crate::core::payout::Balance;
use crate::core::payout::LedgerSummary;
use crate::core::payout::PayoutReceipt;
use crate::core::payout::ProjectStatus;
use crate::core::payout::StageProgress;
use crate::core::stage::MilestoneStage;

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Summarizes receipts against the current balance.
#[must_use]
pub fn summarize_ledger(receipts: &[PayoutReceipt], balance: &Balance) -> LedgerSummary {
    let total_paid = round_to_cents(receipts.iter().map(|receipt| receipt.amount).sum());
    let average_confidence_pct = if receipts.is_empty() {
        None
    } else {
        let total_pct: f64 =
            receipts.iter().map(|receipt| round_half_up(receipt.confidence * 100.0)).sum();
        Some(round_half_up(total_pct / count_as_f64(receipts.len())))
    };
    LedgerSummary {
        transaction_count: receipts.len(),
        total_paid,
        average_confidence_pct,
        available: balance.available,
        currency: balance.currency.clone(),
    }
}

// ============================================================================
// SECTION: Project Status
// ============================================================================

/// Builds stage-by-stage status for one project.
///
/// Receipts for other projects are ignored. A stage is completed when any
/// receipt's milestone contains the stage id. `receipts` are expected newest
/// first, as [`crate::PaymentLedger::transactions`] returns them, and the
/// newest such receipt is reported.
#[must_use]
pub fn project_status(project_id: &ProjectId, receipts: &[PayoutReceipt]) -> ProjectStatus {
    let project_receipts: Vec<&PayoutReceipt> =
        receipts.iter().filter(|receipt| receipt.project_id == *project_id).collect();
    let stages: Vec<StageProgress> = MilestoneStage::all()
        .into_iter()
        .map(|stage| {
            let completing =
                project_receipts.iter().find(|receipt| receipt.milestone.contains(stage.id()));
            StageProgress {
                stage,
                label: stage.label().to_string(),
                order: stage.order(),
                completed: completing.is_some(),
                tx_id: completing.map(|receipt| receipt.tx_id.clone()),
                amount: completing.map(|receipt| receipt.amount),
            }
        })
        .collect();
    let completed_stages = stages.iter().filter(|progress| progress.completed).count();
    let total_stages = stages.len();
    let progress_pct =
        round_half_up(count_as_f64(completed_stages) / count_as_f64(total_stages) * 100.0);
    let total_paid = round_to_cents(project_receipts.iter().map(|receipt| receipt.amount).sum());
    ProjectStatus {
        project_id: project_id.clone(),
        stages,
        completed_stages,
        total_stages,
        progress_pct,
        total_paid,
    }
}

/// Converts a collection length to `f64` for averaging.
#[allow(clippy::cast_precision_loss, reason = "Receipt counts stay far below 2^52.")]
fn count_as_f64(count: usize) -> f64 {
    count as f64
}
