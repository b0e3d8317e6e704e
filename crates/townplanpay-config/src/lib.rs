// crates/townplanpay-config/src/lib.rs
// ============================================================================
// Module: TownPlanPay Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for townplanpay.toml semantics.
// Dependencies: townplanpay-core, serde, toml
// ============================================================================

//! ## Overview
//! `townplanpay-config` defines the configuration model for the TownPlanPay
//! service. Loading is strict and fail-closed: oversized, non-UTF-8, or
//! inconsistent files are rejected before the server starts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
