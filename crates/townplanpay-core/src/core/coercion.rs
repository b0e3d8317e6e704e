// crates/townplanpay-core/src/core/coercion.rs
// ============================================================================
// Module: TownPlanPay Evidence Coercion
// Description: Loose numeric coercion of raw JSON evidence values.
// Purpose: Turn portal-submitted JSON values into evaluator numbers.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Evidence arrives from a browser form, so fields may be missing, `null`,
//! booleans, strings, or numbers. Coercion is total: every JSON value maps to
//! an `f64`, and values that are not numeric text map to `NaN`.
//!
//! ## Invariants
//! - Falsy inputs (missing, `null`, `false`, `0`, `""`) resolve to the fallback.
//! - Non-empty strings never resolve to the fallback; whitespace-only text is `0`.
//! - Objects and multi-element arrays are `NaN`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

// ============================================================================
// SECTION: Field Coercion
// ============================================================================

/// Coerces an optional JSON field value, substituting `fallback` for falsy input.
#[must_use]
pub fn coerce_field(value: Option<&Value>, fallback: f64) -> f64 {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => fallback,
        Some(Value::Bool(true)) => 1.0,
        Some(Value::Number(number)) => {
            let numeric = number.as_f64().unwrap_or(f64::NAN);
            if numeric == 0.0 { fallback } else { numeric }
        }
        Some(Value::String(text)) if text.is_empty() => fallback,
        Some(other) => coerce_value(other),
    }
}

/// Coerces a JSON value to a number without any fallback substitution.
#[must_use]
pub fn coerce_value(value: &Value) -> f64 {
    match value {
        Value::Null | Value::Bool(false) => 0.0,
        Value::Bool(true) => 1.0,
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => parse_numeric_text(text),
        Value::Array(items) => coerce_array(items),
        Value::Object(_) => f64::NAN,
    }
}

/// Coerces an array through its joined text form.
fn coerce_array(items: &[Value]) -> f64 {
    match items {
        [] => 0.0,
        [single] => match single {
            Value::Null => 0.0,
            Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
            Value::String(text) => parse_numeric_text(text),
            Value::Array(inner) => coerce_array(inner),
            Value::Bool(_) | Value::Object(_) => f64::NAN,
        },
        _ => f64::NAN,
    }
}

// ============================================================================
// SECTION: Text Parsing
// ============================================================================

/// Parses numeric text: decimal, exponent, `Infinity`, and `0x`/`0o`/`0b` literals.
///
/// Leading and trailing whitespace is ignored; whitespace-only text is `0`.
/// Anything else is `NaN`.
#[must_use]
pub fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }
    if is_decimal_literal(trimmed) {
        return trimmed.parse::<f64>().unwrap_or(f64::NAN);
    }
    f64::NAN
}

/// Parses unsigned `0x`, `0o`, or `0b` literals; returns `None` for other text.
fn parse_radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &text[2 ..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut value = 0.0_f64;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            return Some(f64::NAN);
        };
        value = value.mul_add(f64::from(radix), f64::from(digit));
    }
    Some(value)
}

/// Returns true when `text` is `[sign] digits [. digits] [(e|E) [sign] digits]`
/// with at least one mantissa digit.
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut index = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        index += 1;
    }
    let integer_digits = count_digits(&bytes[index ..]);
    index += integer_digits;
    let mut fraction_digits = 0;
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        fraction_digits = count_digits(&bytes[index ..]);
        index += fraction_digits;
    }
    if integer_digits + fraction_digits == 0 {
        return false;
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let exponent_digits = count_digits(&bytes[index ..]);
        if exponent_digits == 0 {
            return false;
        }
        index += exponent_digits;
    }
    index == bytes.len()
}

/// Counts leading ASCII digits.
fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
