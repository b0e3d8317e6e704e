// crates/townplanpay-core/src/core/evidence.rs
// ============================================================================
// Module: TownPlanPay Evidence Model
// Description: Milestone evidence record and its construction from raw JSON.
// Purpose: Provide the evaluator input with explicit coercion policy.
// Dependencies: crate::core::coercion, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`MilestoneEvidence`] holds the four numeric signals the evaluator reads.
//! Raw submissions are coerced field by field (see [`crate::core::coercion`]).
//! [`CoercionMode::Compatible`] keeps `NaN` results so they propagate through
//! the score; [`CoercionMode::Strict`] rejects them up front. Neither mode
//! validates ranges: negative and greater-than-one values pass through.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::coercion::coerce_field;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Budget used when `notional_budget` is missing or falsy.
pub const DEFAULT_NOTIONAL_BUDGET: f64 = 1000.0;

// ============================================================================
// SECTION: Fields
// ============================================================================

/// Evidence fields read from a milestone submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceField {
    /// Photo-evidence quality signal.
    ImageScore,
    /// Site inspector confidence signal.
    InspectorConfidence,
    /// Reported completion fraction.
    PercentComplete,
    /// Reference budget for the suggested amount.
    NotionalBudget,
}

impl EvidenceField {
    /// All fields in evaluation order.
    pub const ALL: [Self; 4] =
        [Self::ImageScore, Self::InspectorConfidence, Self::PercentComplete, Self::NotionalBudget];

    /// Returns the wire name of the field.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::ImageScore => "image_score",
            Self::InspectorConfidence => "inspector_confidence",
            Self::PercentComplete => "percent_complete",
            Self::NotionalBudget => "notional_budget",
        }
    }

    /// Returns the value substituted for missing or falsy input.
    #[must_use]
    pub const fn fallback(self) -> f64 {
        match self {
            Self::ImageScore | Self::InspectorConfidence | Self::PercentComplete => 0.0,
            Self::NotionalBudget => DEFAULT_NOTIONAL_BUDGET,
        }
    }
}

impl fmt::Display for EvidenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

// ============================================================================
// SECTION: Coercion Mode
// ============================================================================

/// Policy for evidence values whose coercion is not a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionMode {
    /// Reject non-numeric values before evaluation.
    #[default]
    Strict,
    /// Keep `NaN` and infinite values and let them flow through the score.
    Compatible,
}

impl CoercionMode {
    /// Returns the stable label for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Compatible => "compatible",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Evidence construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvidenceError {
    /// Submission body was not a JSON object.
    #[error("evidence must be a json object")]
    NotAnObject,
    /// A field did not coerce to a finite number under strict coercion.
    #[error("evidence field {field} is not numeric")]
    NonNumeric {
        /// Offending field.
        field: EvidenceField,
    },
}

// ============================================================================
// SECTION: Evidence Record
// ============================================================================

/// Coerced milestone evidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MilestoneEvidence {
    /// Photo-evidence quality signal, expected in `[0, 1]`.
    pub image_score: f64,
    /// Site inspector confidence, expected in `[0, 1]`.
    pub inspector_confidence: f64,
    /// Completion fraction, expected in `[0, 1]`.
    pub percent_complete: f64,
    /// Reference budget the suggested amount is computed against.
    pub notional_budget: f64,
}

impl Default for MilestoneEvidence {
    fn default() -> Self {
        Self {
            image_score: 0.0,
            inspector_confidence: 0.0,
            percent_complete: 0.0,
            notional_budget: DEFAULT_NOTIONAL_BUDGET,
        }
    }
}

impl MilestoneEvidence {
    /// Builds evidence from a raw JSON submission.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::NotAnObject`] when `value` is not an object,
    /// and [`EvidenceError::NonNumeric`] for non-finite fields under
    /// [`CoercionMode::Strict`].
    pub fn from_json(value: &Value, mode: CoercionMode) -> Result<Self, EvidenceError> {
        let Value::Object(fields) = value else {
            return Err(EvidenceError::NotAnObject);
        };
        Self::from_fields(fields, mode)
    }

    /// Builds evidence from a JSON object map.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::NonNumeric`] for non-finite fields under
    /// [`CoercionMode::Strict`].
    pub fn from_fields(
        fields: &Map<String, Value>,
        mode: CoercionMode,
    ) -> Result<Self, EvidenceError> {
        let read = |field: EvidenceField| -> Result<f64, EvidenceError> {
            let value = coerce_field(fields.get(field.wire_name()), field.fallback());
            if mode == CoercionMode::Strict && !value.is_finite() {
                return Err(EvidenceError::NonNumeric {
                    field,
                });
            }
            Ok(value)
        };
        Ok(Self {
            image_score: read(EvidenceField::ImageScore)?,
            inspector_confidence: read(EvidenceField::InspectorConfidence)?,
            percent_complete: read(EvidenceField::PercentComplete)?,
            notional_budget: read(EvidenceField::NotionalBudget)?,
        })
    }
}

// ============================================================================
// SECTION: Submission Metadata
// ============================================================================

/// Descriptive fields sent alongside evidence. Never read by the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    /// Project name from the portal form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Milestone stage identifier from the portal form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    /// Free-form work description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// GPS coordinates as entered or detected.
    #[serde(default, rename = "gpsCoordinates", skip_serializing_if = "Option::is_none")]
    pub gps_coordinates: Option<String>,
}

impl SubmissionMetadata {
    /// Extracts string metadata from a submission, ignoring non-string values.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            project_id: text("project_id"),
            milestone: text("milestone"),
            description: text("description"),
            gps_coordinates: text("gpsCoordinates"),
        }
    }
}
