// crates/townplanpay-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the `config example` command.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for TownPlanPay configuration. The example carries
//! every key with its default value and must always load cleanly.

/// Returns a canonical example `townplanpay.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
bind = "127.0.0.1:8080"
max_body_bytes = 65536
allow_non_loopback = false

[server.audit]
sink = "stderr"
# path = "townplanpay-audit.jsonl"

[evaluator]
coercion = "strict"

[payments]
starting_balance = 50000.0
currency = "USDC"
"#,
    )
}
