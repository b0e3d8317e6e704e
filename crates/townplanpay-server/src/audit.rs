// crates/townplanpay-server/src/audit.rs
// ============================================================================
// Module: Server Audit Logging
// Description: Structured audit events for request handling and payouts.
// Purpose: Emit JSON-line audit logs without a logging framework dependency.
// Dependencies: townplanpay-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events are flat JSON objects tagged by an `event` field and written
//! one per line. Sinks swallow write failures; auditing never fails a request.
//! Evidence payloads are not logged, only sizes and outcome labels.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use townplanpay_core::CoercionMode;
use townplanpay_core::Decision;
use townplanpay_core::PayoutReceipt;

// ============================================================================
// SECTION: Types
// ============================================================================

/// HTTP request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct HttpAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Route template that handled the request.
    pub route: &'static str,
    /// HTTP status code returned.
    pub status: u16,
    /// `ok` or `error`.
    pub outcome: &'static str,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Evaluator decision for suggestion requests.
    pub decision: Option<Decision>,
    /// Project identifier when the request named one.
    pub project_id: Option<String>,
    /// Milestone label when the request named one.
    pub milestone: Option<String>,
}

/// Inputs for [`HttpAuditEvent::new`].
#[derive(Debug, Clone, Default)]
pub struct HttpAuditEventParams {
    /// Route template that handled the request.
    pub route: &'static str,
    /// HTTP status code returned.
    pub status: u16,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Evaluator decision for suggestion requests.
    pub decision: Option<Decision>,
    /// Project identifier when the request named one.
    pub project_id: Option<String>,
    /// Milestone label when the request named one.
    pub milestone: Option<String>,
}

/// Ledger payout audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Transaction identifier.
    pub tx_id: String,
    /// Project paid against.
    pub project_id: String,
    /// Milestone label.
    pub milestone: String,
    /// Debited amount.
    pub amount: f64,
    /// Available balance after the debit.
    pub balance_after: f64,
    /// Ledger currency code.
    pub currency: String,
}

/// Server startup audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ServerStartEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Address the listener is bound to.
    pub bind: String,
    /// Evidence coercion mode in effect.
    pub coercion: CoercionMode,
    /// Ledger currency code.
    pub currency: String,
    /// Ledger starting balance.
    pub starting_balance: f64,
}

impl HttpAuditEvent {
    /// Builds an HTTP audit event stamped with the current time.
    #[must_use]
    pub fn new(params: HttpAuditEventParams) -> Self {
        let outcome = if params.status < 400 { "ok" } else { "error" };
        Self {
            event: "http_request",
            timestamp_ms: timestamp_ms(),
            route: params.route,
            status: params.status,
            outcome,
            error_kind: params.error_kind,
            request_bytes: params.request_bytes,
            response_bytes: params.response_bytes,
            decision: params.decision,
            project_id: params.project_id,
            milestone: params.milestone,
        }
    }
}

impl PayoutAuditEvent {
    /// Builds a payout audit event from a receipt and the resulting balance.
    #[must_use]
    pub fn new(receipt: &PayoutReceipt, balance_after: f64) -> Self {
        Self {
            event: "payout",
            timestamp_ms: timestamp_ms(),
            tx_id: receipt.tx_id.to_string(),
            project_id: receipt.project_id.to_string(),
            milestone: receipt.milestone.clone(),
            amount: receipt.amount,
            balance_after,
            currency: receipt.currency.clone(),
        }
    }
}

impl ServerStartEvent {
    /// Builds a startup audit event.
    #[must_use]
    pub fn new(
        bind: String,
        coercion: CoercionMode,
        currency: String,
        starting_balance: f64,
    ) -> Self {
        Self {
            event: "server_start",
            timestamp_ms: timestamp_ms(),
            bind,
            coercion,
            currency,
            starting_balance,
        }
    }
}

/// Milliseconds since the Unix epoch, or zero when the clock is before it.
fn timestamp_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for server events.
pub trait AuditSink: Send + Sync {
    /// Record an HTTP request event.
    fn record(&self, event: &HttpAuditEvent);

    /// Record a payout event.
    fn record_payout(&self, _event: &PayoutAuditEvent) {}

    /// Record a server startup event.
    fn record_start(&self, _event: &ServerStartEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one serialized event to stderr.
    fn emit(event: &impl Serialize) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &HttpAuditEvent) {
        Self::emit(event);
    }

    fn record_payout(&self, event: &PayoutAuditEvent) {
        Self::emit(event);
    }

    fn record_start(&self, event: &ServerStartEvent) {
        Self::emit(event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event and flushes.
    fn emit(&self, event: &impl Serialize) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &HttpAuditEvent) {
        self.emit(event);
    }

    fn record_payout(&self, event: &PayoutAuditEvent) {
        self.emit(event);
    }

    fn record_start(&self, event: &ServerStartEvent) {
        self.emit(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &HttpAuditEvent) {}
}
