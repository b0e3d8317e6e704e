// crates/townplanpay-core/tests/evaluator.rs
// ============================================================================
// Module: Milestone Evaluator Tests
// Description: Worked examples and edge cases for the milestone evaluator.
// Purpose: Pin the scoring formula, thresholds, rounding, and trace text.
// Dependencies: townplanpay-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises [`evaluate_milestone`] through raw JSON submissions so coercion
//! and scoring are covered together.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::float_cmp,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use serde_json::Value;
use serde_json::json;
use townplanpay_core::CoercionMode;
use townplanpay_core::Decision;
use townplanpay_core::MilestoneDecision;
use townplanpay_core::MilestoneEvidence;
use townplanpay_core::evaluate_milestone;

/// Coerces `input` in the given mode and evaluates it.
fn evaluate_json(input: &Value, mode: CoercionMode) -> MilestoneDecision {
    let evidence = MilestoneEvidence::from_json(input, mode).expect("evidence");
    evaluate_milestone(&evidence)
}

// ============================================================================
// SECTION: Worked Examples
// ============================================================================

/// Verifies the reference approval example.
#[test]
fn reference_submission_is_approved() {
    let decision = evaluate_json(
        &json!({
            "image_score": 0.75,
            "inspector_confidence": 0.85,
            "percent_complete": 0.6,
            "notional_budget": 1000
        }),
        CoercionMode::Strict,
    );
    assert_eq!(decision.decision, Decision::Approve);
    assert_eq!(decision.confidence, 0.75);
    assert_eq!(decision.suggested_amount, 450.0);
    assert_eq!(
        decision.explanation,
        "Heuristic score=0.750 (image:0.75, inspector:0.85, pct:0.6)"
    );
}

/// Verifies an empty submission falls back to all defaults.
#[test]
fn empty_submission_is_denied_with_zero_amount() {
    let decision = evaluate_json(&json!({}), CoercionMode::Strict);
    assert_eq!(decision.decision, Decision::Deny);
    assert_eq!(decision.confidence, 0.0);
    assert_eq!(decision.suggested_amount, 0.0);
    assert_eq!(decision.explanation, "Heuristic score=0.000 (image:0, inspector:0, pct:0)");
}

/// Verifies the budget multiplies with both completion and score.
#[test]
fn suggested_amount_compounds_completion_and_score() {
    let decision = evaluate_json(
        &json!({
            "image_score": 0.8,
            "inspector_confidence": 0.9,
            "percent_complete": 0.4
        }),
        CoercionMode::Strict,
    );
    assert_eq!(decision.decision, Decision::Approve);
    assert_eq!(decision.suggested_amount, 300.0);

    let larger_budget = evaluate_json(
        &json!({
            "image_score": 0.9,
            "inspector_confidence": 0.8,
            "percent_complete": 1.0,
            "notional_budget": 2500
        }),
        CoercionMode::Strict,
    );
    assert_eq!(larger_budget.suggested_amount, 2225.0);
    assert_eq!(
        larger_budget.explanation,
        "Heuristic score=0.890 (image:0.9, inspector:0.8, pct:1)"
    );
}

// ============================================================================
// SECTION: Threshold
// ============================================================================

/// Verifies a score of exactly 0.6 approves and 0.58 denies.
#[test]
fn threshold_is_inclusive() {
    let at_threshold = evaluate_json(
        &json!({"image_score": 0.6, "inspector_confidence": 0.6, "percent_complete": 0.6}),
        CoercionMode::Strict,
    );
    assert_eq!(at_threshold.decision, Decision::Approve);
    assert_eq!(at_threshold.suggested_amount, 360.0);

    let below = evaluate_json(
        &json!({"image_score": 0.6, "inspector_confidence": 0.6, "percent_complete": 0.5}),
        CoercionMode::Strict,
    );
    assert_eq!(below.decision, Decision::Deny);
    assert_eq!(below.suggested_amount, 290.0);
    assert!(below.explanation.starts_with("Heuristic score=0.580 "));
}

// ============================================================================
// SECTION: Out-of-Range Inputs
// ============================================================================

/// Verifies negative inputs propagate into a negative amount.
#[test]
fn negative_inputs_propagate() {
    let decision = evaluate_json(
        &json!({"image_score": -1, "inspector_confidence": 0.5, "percent_complete": 0.5}),
        CoercionMode::Strict,
    );
    assert_eq!(decision.decision, Decision::Deny);
    assert_eq!(decision.confidence, 0.0);
    assert_eq!(decision.suggested_amount, -125.0);
    assert_eq!(
        decision.explanation,
        "Heuristic score=-0.250 (image:-1, inspector:0.5, pct:0.5)"
    );
}

/// Verifies scores above one are clamped only in the confidence.
#[test]
fn scores_above_one_clamp_confidence_only() {
    let decision = evaluate_json(
        &json!({"image_score": 2, "inspector_confidence": 2, "percent_complete": 2}),
        CoercionMode::Strict,
    );
    assert_eq!(decision.decision, Decision::Approve);
    assert_eq!(decision.confidence, 1.0);
    assert_eq!(decision.suggested_amount, 4000.0);
    assert!(decision.explanation.starts_with("Heuristic score=2.000 "));
}

/// Verifies a zero budget falls back to the default budget.
#[test]
fn zero_budget_uses_default_budget() {
    let decision = evaluate_json(
        &json!({
            "image_score": 1,
            "inspector_confidence": 1,
            "percent_complete": 1,
            "notional_budget": 0
        }),
        CoercionMode::Strict,
    );
    assert_eq!(decision.suggested_amount, 1000.0);
}

// ============================================================================
// SECTION: Non-Numeric Inputs
// ============================================================================

/// Verifies compatible coercion lets `NaN` flow into a denial.
#[test]
fn compatible_mode_propagates_nan() {
    let decision = evaluate_json(
        &json!({"image_score": "abc", "inspector_confidence": 0.9, "percent_complete": 0.9}),
        CoercionMode::Compatible,
    );
    assert_eq!(decision.decision, Decision::Deny);
    assert!(decision.confidence.is_nan());
    assert!(decision.suggested_amount.is_nan());
    assert_eq!(
        decision.explanation,
        "Heuristic score=NaN (image:NaN, inspector:0.9, pct:0.9)"
    );

    let encoded = serde_json::to_value(&decision).expect("serialize");
    assert_eq!(encoded["decision"], json!("deny"));
    assert_eq!(encoded["confidence"], Value::Null);
    assert_eq!(encoded["suggested_amount"], Value::Null);
}

/// Verifies numeric strings behave like numbers in either mode.
#[test]
fn numeric_strings_are_accepted() {
    for mode in [CoercionMode::Strict, CoercionMode::Compatible] {
        let decision = evaluate_json(
            &json!({
                "image_score": "0.75",
                "inspector_confidence": " 0.85 ",
                "percent_complete": "0.6",
                "notional_budget": "1000"
            }),
            mode,
        );
        assert_eq!(decision.decision, Decision::Approve);
        assert_eq!(decision.suggested_amount, 450.0);
    }
}

/// Verifies scores on an exact half-thousandth round up in the trace.
#[test]
fn explanation_score_ties_round_up() {
    let cases = [
        (json!({"image_score": 0.125}), "Heuristic score=0.063 (image:0.125, inspector:0, pct:0)"),
        (json!({"image_score": 0.625}), "Heuristic score=0.313 (image:0.625, inspector:0, pct:0)"),
        (
            json!({"image_score": true, "inspector_confidence": true, "percent_complete": 0.0625}),
            "Heuristic score=0.813 (image:1, inspector:1, pct:0.0625)",
        ),
    ];
    for (input, expected) in cases {
        let decision = evaluate_json(&input, CoercionMode::Strict);
        assert_eq!(decision.explanation, expected);
    }
}

/// Verifies evidence parsed from JSON text keeps its exact float value.
#[test]
fn parsed_evidence_keeps_shortest_round_trip_value() {
    let input: Value =
        serde_json::from_str(r#"{"image_score": 0.44999999999999996}"#).expect("json");
    let evidence = MilestoneEvidence::from_json(&input, CoercionMode::Strict).expect("evidence");
    assert_eq!(evidence.image_score, 0.449_999_999_999_999_96);
    assert_ne!(evidence.image_score, 0.45);
    let decision = evaluate_milestone(&evidence);
    assert!(decision.explanation.contains("image:0.44999999999999996"), "{}", decision.explanation);
}

// ============================================================================
// SECTION: Determinism
// ============================================================================

/// Verifies repeated evaluation yields identical output.
#[test]
fn evaluation_is_idempotent() {
    let input = json!({"image_score": 0.5, "inspector_confidence": 0.7, "percent_complete": 0.3});
    let first = evaluate_json(&input, CoercionMode::Strict);
    let second = evaluate_json(&input, CoercionMode::Strict);
    assert_eq!(first, second);
}

/// Verifies a decision survives a JSON round trip, including `null` numbers.
#[test]
fn decision_json_round_trip_keeps_nan_as_null() {
    let decision = evaluate_json(&json!({"percent_complete": {}}), CoercionMode::Compatible);
    let text = serde_json::to_string(&decision).expect("serialize");
    let decoded: MilestoneDecision = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(decoded.decision, Decision::Deny);
    assert!(decoded.confidence.is_nan());
    assert_eq!(decoded.explanation, decision.explanation);
}
