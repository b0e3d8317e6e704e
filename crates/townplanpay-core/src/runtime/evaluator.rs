// crates/townplanpay-core/src/runtime/evaluator.rs
// ============================================================================
// Module: TownPlanPay Milestone Evaluator
// Description: Weighted heuristic that scores milestone evidence.
// Purpose: Map coerced evidence to an approve/deny decision and amount.
// Dependencies: crate::core::{decision, evidence, number}
// ============================================================================

//! ## Overview
//! The evaluator is a pure function:
//!
//! ```text
//! score      = 0.5 * image + 0.3 * inspector + 0.2 * percent
//! decision   = approve if score >= 0.6 else deny
//! amount     = round_cents(budget * percent * score)
//! confidence = clamp(score, 0, 1)
//! ```
//!
//! The amount compounds `percent_complete` with the score; this is the
//! documented payout formula and must not be "corrected". Out-of-range and
//! negative inputs are not rejected, and `NaN` inputs yield a `deny` with
//! `NaN` amount and confidence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::decision::Decision;
use crate::core::decision::MilestoneDecision;
use crate::core::evidence::MilestoneEvidence;
use crate::core::number::format_fixed;
use crate::core::number::format_number;
use crate::core::number::normalize_zero;
use crate::core::number::round_to_cents;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Weight of the photo-evidence signal.
pub const IMAGE_WEIGHT: f64 = 0.5;
/// Weight of the inspector confidence signal.
pub const INSPECTOR_WEIGHT: f64 = 0.3;
/// Weight of the completion signal.
pub const PROGRESS_WEIGHT: f64 = 0.2;
/// Minimum composite score for approval (inclusive).
pub const APPROVAL_THRESHOLD: f64 = 0.6;

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Computes the weighted composite score.
#[must_use]
#[allow(
    clippy::suboptimal_flops,
    reason = "Separate multiply and add steps keep scores bit-identical to the published formula."
)]
pub fn composite_score(evidence: &MilestoneEvidence) -> f64 {
    evidence.image_score * IMAGE_WEIGHT
        + evidence.inspector_confidence * INSPECTOR_WEIGHT
        + evidence.percent_complete * PROGRESS_WEIGHT
}

/// Evaluates milestone evidence into a payment decision.
#[must_use]
pub fn evaluate_milestone(evidence: &MilestoneEvidence) -> MilestoneDecision {
    let score = composite_score(evidence);
    let decision = if score >= APPROVAL_THRESHOLD { Decision::Approve } else { Decision::Deny };
    let suggested_amount =
        round_to_cents(evidence.notional_budget * evidence.percent_complete * score);
    MilestoneDecision {
        decision,
        suggested_amount,
        explanation: explain(score, evidence),
        confidence: normalize_zero(score.clamp(0.0, 1.0)),
    }
}

/// Builds the formula trace embedded in the decision.
fn explain(score: f64, evidence: &MilestoneEvidence) -> String {
    format!(
        "Heuristic score={} (image:{}, inspector:{}, pct:{})",
        format_fixed(score, 3),
        format_number(evidence.image_score),
        format_number(evidence.inspector_confidence),
        format_number(evidence.percent_complete),
    )
}
