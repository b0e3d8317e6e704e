// crates/townplanpay-core/src/core/time.rs
// ============================================================================
// Module: TownPlanPay Time Model
// Description: Timestamp representation for ledger records.
// Purpose: Keep wall-clock reads out of the core.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The ledger stamps receipts with a caller-supplied [`Timestamp`]. Hosts read
//! the clock; tests pass logical values for replayable output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Timestamp recorded on payout receipts.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - No ordering validation is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }
}
