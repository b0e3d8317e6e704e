// crates/townplanpay-core/src/core/decision.rs
// ============================================================================
// Module: TownPlanPay Decision Model
// Description: Evaluator output record.
// Purpose: Define the approve/deny decision and its supporting values.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`MilestoneDecision`] is the evaluator's full answer. `NaN` amounts or
//! confidences serialize as JSON `null`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Payment recommendation produced by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Composite score met the approval threshold.
    Approve,
    /// Composite score fell below the threshold (or was `NaN`).
    Deny,
}

impl Decision {
    /// Returns the stable label for the decision.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deny => "deny",
        }
    }

    /// Returns true for [`Decision::Approve`].
    #[must_use]
    pub const fn is_approve(self) -> bool {
        matches!(self, Self::Approve)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluator output for one milestone submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneDecision {
    /// Approve or deny.
    pub decision: Decision,
    /// Proposed payment, rounded to cents.
    #[serde(deserialize_with = "nullable_f64")]
    pub suggested_amount: f64,
    /// Formula trace with the score and raw inputs.
    pub explanation: String,
    /// Composite score clamped to `[0, 1]`.
    #[serde(deserialize_with = "nullable_f64")]
    pub confidence: f64,
}

/// Reads a number that may have been written as `null` for `NaN`.
fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
