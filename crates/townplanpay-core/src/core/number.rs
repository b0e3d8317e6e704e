// crates/townplanpay-core/src/core/number.rs
// ============================================================================
// Module: TownPlanPay Number Formatting
// Description: Rounding and text rendering for evaluator output numbers.
// Purpose: Keep amounts and explanation strings stable across hosts.
// Dependencies: Standard library
// ============================================================================

//! ## Overview
//! Amounts round to cents with ties going toward positive infinity, and
//! explanation numbers render in shortest round-trip form with `NaN` and
//! `Infinity` spelled out. Negative zero is normalized to `0` everywhere.

// ============================================================================
// SECTION: Rounding
// ============================================================================

/// Rounds to the nearest integer, breaking ties toward positive infinity.
///
/// Non-finite values pass through unchanged.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    normalize_zero(rounded)
}

/// Rounds a monetary value to two decimal places.
#[must_use]
pub fn round_to_cents(value: f64) -> f64 {
    normalize_zero(round_half_up(value * 100.0) / 100.0)
}

/// Maps `-0.0` to `0.0` and leaves every other value alone.
#[must_use]
pub fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Lower bound (inclusive) for exponent rendering of large magnitudes.
const EXPONENT_UPPER: f64 = 1e21;
/// Upper bound (exclusive) for exponent rendering of small magnitudes.
const EXPONENT_LOWER: f64 = 1e-6;

/// Renders a number in shortest round-trip decimal form.
///
/// `0.75` renders as `0.75`, `1.0` as `1`, `1e21` as `1e+21`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if let Some(text) = non_finite_text(value) {
        return text.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= EXPONENT_UPPER || magnitude < EXPONENT_LOWER {
        return format_exponent(value);
    }
    format!("{value}")
}

/// Fractional digits that render any finite `f64` without rounding.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Renders a number with exactly `digits` fractional digits.
///
/// Rounding works on the exact decimal expansion and breaks ties away from
/// zero, so `0.0625` renders as `0.063`. Negative values that round to zero
/// keep their sign (`-0.0001` renders as `-0.000`).
#[must_use]
pub fn format_fixed(value: f64, digits: usize) -> String {
    if let Some(text) = non_finite_text(value) {
        return text.to_string();
    }
    if value.abs() >= EXPONENT_UPPER {
        return format_number(value);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut kept: Vec<u8> = whole.bytes().chain(fraction.bytes().take(digits)).collect();
    if fraction.as_bytes().get(digits).is_some_and(|digit| *digit >= b'5') {
        increment_decimal(&mut kept);
    }
    let (int_digits, frac_digits) = kept.split_at(kept.len().saturating_sub(digits));
    let int_text: String = int_digits.iter().copied().map(char::from).collect();
    if digits == 0 {
        return format!("{sign}{int_text}");
    }
    let frac_text: String = frac_digits.iter().copied().map(char::from).collect();
    format!("{sign}{int_text}.{frac_text}")
}

/// Adds one unit in the last place to a string of ASCII decimal digits.
fn increment_decimal(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Returns the spelled-out form of a non-finite value.
fn non_finite_text(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

/// Renders exponent notation with an explicit sign on positive exponents.
fn format_exponent(value: f64) -> String {
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
