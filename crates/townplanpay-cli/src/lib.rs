// crates/townplanpay-cli/src/lib.rs
// ============================================================================
// Module: TownPlanPay CLI Library
// Description: Shared helpers for the TownPlanPay command-line interface.
// Purpose: Provide the message catalog and suggestion client to the binary.
// Dependencies: reqwest, serde, serde_json, thiserror, townplanpay-core
// ============================================================================

//! ## Overview
//! This library houses the CLI message catalog and the HTTP client used by
//! `townplanpay suggest`. The binary entry point (`src/main.rs`) imports these
//! helpers so all user-facing output stays consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Client for a running suggestion service.
pub mod client;
/// Internationalization helpers and message catalog.
pub mod i18n;
