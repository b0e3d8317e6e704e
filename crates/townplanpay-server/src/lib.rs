// crates/townplanpay-server/src/lib.rs
// ============================================================================
// Module: TownPlanPay Server
// Description: HTTP service for milestone evaluation and simulated payouts.
// Purpose: Expose the evaluator and ledger over JSON HTTP routes.
// Dependencies: townplanpay-core, townplanpay-config, axum, tokio
// ============================================================================

//! ## Overview
//! The server wraps [`townplanpay_core::evaluate_milestone`] and an in-memory
//! payout ledger behind a small JSON API. Every request produces one
//! structured audit event; payouts produce an additional ledger event.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::HttpAuditEvent;
pub use audit::HttpAuditEventParams;
pub use audit::NoopAuditSink;
pub use audit::PayoutAuditEvent;
pub use audit::ServerStartEvent;
pub use audit::StderrAuditSink;
pub use server::ServerError;
pub use server::TownPlanPayServer;
