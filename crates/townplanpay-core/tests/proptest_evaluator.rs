// crates/townplanpay-core/tests/proptest_evaluator.rs
// ============================================================================
// Module: Evaluator Property-Based Tests
// Description: Property tests for evaluator bounds and coercion totality.
// Purpose: Detect panics and invariant breaks across wide input ranges.
// ============================================================================

//! Property-based tests for milestone evaluator invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use serde_json::Value;
use townplanpay_core::APPROVAL_THRESHOLD;
use townplanpay_core::CoercionMode;
use townplanpay_core::Decision;
use townplanpay_core::MilestoneEvidence;
use townplanpay_core::composite_score;
use townplanpay_core::evaluate_milestone;

fn evidence(image: f64, inspector: f64, percent: f64, budget: f64) -> MilestoneEvidence {
    MilestoneEvidence {
        image_score: image,
        inspector_confidence: inspector,
        percent_complete: percent,
        notional_budget: budget,
    }
}

fn json_value_strategy(max_depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Number(v.into())),
        any::<f64>()
            .prop_filter("finite", |v| v.is_finite())
            .prop_map(|v| { serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number) }),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(max_depth, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 3).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0 .. 3)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn confidence_stays_in_unit_interval(
        image in -10.0f64 .. 10.0,
        inspector in -10.0f64 .. 10.0,
        percent in -10.0f64 .. 10.0,
        budget in 1.0f64 .. 1.0e6,
    ) {
        let decision = evaluate_milestone(&evidence(image, inspector, percent, budget));
        prop_assert!((0.0 ..= 1.0).contains(&decision.confidence));
    }

    #[test]
    fn approval_matches_threshold(
        image in -2.0f64 .. 2.0,
        inspector in -2.0f64 .. 2.0,
        percent in -2.0f64 .. 2.0,
    ) {
        let input = evidence(image, inspector, percent, 1000.0);
        let decision = evaluate_milestone(&input);
        let approve = composite_score(&input) >= APPROVAL_THRESHOLD;
        prop_assert_eq!(decision.decision == Decision::Approve, approve);
    }

    #[test]
    fn score_is_monotonic_in_each_signal(
        image in 0.0f64 .. 1.0,
        inspector in 0.0f64 .. 1.0,
        percent in 0.0f64 .. 1.0,
        bump in 0.0f64 .. 1.0,
    ) {
        let base = composite_score(&evidence(image, inspector, percent, 1000.0));
        prop_assert!(composite_score(&evidence(image + bump, inspector, percent, 1000.0)) >= base);
        prop_assert!(composite_score(&evidence(image, inspector + bump, percent, 1000.0)) >= base);
        prop_assert!(composite_score(&evidence(image, inspector, percent + bump, 1000.0)) >= base);
    }

    #[test]
    fn compatible_coercion_is_total(fields in prop::collection::btree_map(
        prop_oneof![
            Just("image_score".to_string()),
            Just("inspector_confidence".to_string()),
            Just("percent_complete".to_string()),
            Just("notional_budget".to_string()),
        ],
        json_value_strategy(2),
        0 .. 4,
    )) {
        let submission = Value::Object(fields.into_iter().collect());
        let evidence = MilestoneEvidence::from_json(&submission, CoercionMode::Compatible)
            .expect("objects always coerce in compatible mode");
        let decision = evaluate_milestone(&evidence);
        if composite_score(&evidence).is_nan() {
            prop_assert_eq!(decision.decision, Decision::Deny);
        }
        let strict = MilestoneEvidence::from_json(&submission, CoercionMode::Strict);
        if let Ok(strict) = strict {
            prop_assert!(strict.image_score.is_finite());
            prop_assert!(strict.notional_budget.is_finite());
        }
    }
}
