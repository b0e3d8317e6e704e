// crates/townplanpay-server/src/server.rs
// ============================================================================
// Module: TownPlanPay HTTP Server
// Description: Axum routes for milestone suggestions and simulated payouts.
// Purpose: Serve the evaluator and ledger as a JSON HTTP API.
// Dependencies: townplanpay-core, townplanpay-config, axum, rand, tokio
// ============================================================================

//! ## Overview
//! Routes:
//!
//! | method | path | response |
//! |---|---|---|
//! | POST | `/suggest-milestone` | [`MilestoneDecision`] |
//! | POST | `/execute-payout` | [`townplanpay_core::PayoutReceipt`] |
//! | GET | `/balance` | [`townplanpay_core::Balance`] |
//! | GET | `/transactions` | receipts, newest first |
//! | GET | `/summary` | [`townplanpay_core::LedgerSummary`] |
//! | GET | `/projects/{project_id}/status` | [`townplanpay_core::ProjectStatus`] |
//!
//! Failures return `{"error": "..."}` with a 4xx/5xx status. POST bodies are
//! capped at `server.max_body_bytes` while they are read; an oversized body is
//! answered by the handler so it gets the JSON error shape and an audit event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path as RoutePath;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use townplanpay_config::AuditSinkKind;
use townplanpay_config::TownPlanPayConfig;
use townplanpay_core::CoercionMode;
use townplanpay_core::EvidenceError;
use townplanpay_core::InMemoryPaymentLedger;
use townplanpay_core::LedgerError;
use townplanpay_core::MilestoneDecision;
use townplanpay_core::MilestoneEvidence;
use townplanpay_core::PaymentLedger;
use townplanpay_core::PayoutContext;
use townplanpay_core::PayoutRequest;
use townplanpay_core::ProjectId;
use townplanpay_core::SharedPaymentLedger;
use townplanpay_core::SubmissionMetadata;
use townplanpay_core::Timestamp;
use townplanpay_core::TransactionId;
use townplanpay_core::evaluate_milestone;
use townplanpay_core::project_status;
use townplanpay_core::summarize_ledger;

use crate::audit::AuditSink;
use crate::audit::FileAuditSink;
use crate::audit::HttpAuditEvent;
use crate::audit::HttpAuditEventParams;
use crate::audit::NoopAuditSink;
use crate::audit::PayoutAuditEvent;
use crate::audit::ServerStartEvent;
use crate::audit::StderrAuditSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix of generated transaction identifiers.
pub const TX_ID_PREFIX: &str = "mock_tx_";

/// Route templates, also used as audit labels.
mod routes {
    /// Milestone suggestion route.
    pub const SUGGEST: &str = "/suggest-milestone";
    /// Payout route.
    pub const PAYOUT: &str = "/execute-payout";
    /// Balance route.
    pub const BALANCE: &str = "/balance";
    /// Transaction history route.
    pub const TRANSACTIONS: &str = "/transactions";
    /// Ledger summary route.
    pub const SUMMARY: &str = "/summary";
    /// Project status route.
    pub const PROJECT_STATUS: &str = "/projects/{project_id}/status";
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// TownPlanPay HTTP server instance.
pub struct TownPlanPayServer {
    /// Validated configuration.
    config: TownPlanPayConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl TownPlanPayServer {
    /// Builds a server from configuration using the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the config is invalid or the audit sink
    /// cannot be opened.
    pub fn from_config(config: TownPlanPayConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let audit = build_audit_sink(&config)?;
        Self::with_audit_sink(config, audit)
    }

    /// Builds a server with an explicit audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when the config is invalid.
    pub fn with_audit_sink(
        config: TownPlanPayConfig,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let ledger = InMemoryPaymentLedger::new(
            config.payments.starting_balance,
            config.payments.currency.clone(),
        );
        let state = Arc::new(ServerState {
            ledger: SharedPaymentLedger::from_ledger(ledger),
            coercion: config.evaluator.coercion,
            max_body_bytes: config.server.max_body_bytes,
            audit,
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the axum router for this server.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_listener(listener).await
    }

    /// Serves on an already-bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when serving fails.
    pub async fn serve_listener(
        self,
        listener: tokio::net::TcpListener,
    ) -> Result<(), ServerError> {
        let bind = listener
            .local_addr()
            .map_err(|err| ServerError::Transport(format!("listener address unavailable: {err}")))?;
        self.state.audit.record_start(&ServerStartEvent::new(
            bind.to_string(),
            self.state.coercion,
            self.config.payments.currency.clone(),
            self.config.payments.starting_balance,
        ));
        let app = self.router();
        axum::serve(listener, app)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

/// Builds the audit sink selected by configuration.
fn build_audit_sink(config: &TownPlanPayConfig) -> Result<Arc<dyn AuditSink>, ServerError> {
    let audit = &config.server.audit;
    match (audit.sink, audit.path.as_deref()) {
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
        (AuditSinkKind::File, Some(path)) => {
            let sink = FileAuditSink::new(Path::new(path.trim()))
                .map_err(|err| ServerError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
        (AuditSinkKind::File, None) => {
            Err(ServerError::Config("server.audit.path is required for the file sink".to_string()))
        }
    }
}

/// Builds the route table over shared state.
fn build_router(state: Arc<ServerState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);
    Router::new()
        .route(routes::SUGGEST, post(handle_suggest))
        .route(routes::PAYOUT, post(handle_payout))
        .route(routes::BALANCE, get(handle_balance))
        .route(routes::TRANSACTIONS, get(handle_transactions))
        .route(routes::SUMMARY, get(handle_summary))
        .route(routes::PROJECT_STATUS, get(handle_project_status))
        .layer(body_limit)
        .with_state(state)
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared server state for HTTP handlers.
struct ServerState {
    /// Simulated payout ledger.
    ledger: SharedPaymentLedger,
    /// Evidence coercion mode.
    coercion: CoercionMode,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
    /// Audit sink for request and payout events.
    audit: Arc<dyn AuditSink>,
}

// ============================================================================
// SECTION: Replies
// ============================================================================

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Human-readable error message.
    error: String,
    /// Balance at the time of an insufficient-funds refusal.
    #[serde(skip_serializing_if = "Option::is_none")]
    available_balance: Option<f64>,
}

/// Serialized handler result plus audit labels.
struct Reply {
    /// HTTP status.
    status: StatusCode,
    /// JSON body bytes.
    body: Vec<u8>,
    /// Normalized error kind label.
    error_kind: Option<&'static str>,
}

impl Reply {
    /// Serializes a success payload.
    fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                body,
                error_kind: None,
            },
            Err(_) => Self::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "serialization_failed",
                "response serialization failed",
            ),
        }
    }

    /// Builds an error reply.
    fn error(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self::error_body(status, kind, ErrorBody {
            error: message.into(),
            available_balance: None,
        })
    }

    /// Builds an error reply from a prepared body.
    fn error_body(status: StatusCode, kind: &'static str, body: ErrorBody) -> Self {
        let body = serde_json::to_vec(&body)
            .unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec());
        Self {
            status,
            body,
            error_kind: Some(kind),
        }
    }
}

/// Request details carried into the audit event.
#[derive(Default)]
struct RequestDetails {
    /// Request body size in bytes.
    request_bytes: usize,
    /// Evaluator decision for suggestion requests.
    decision: Option<townplanpay_core::Decision>,
    /// Project identifier when supplied.
    project_id: Option<String>,
    /// Milestone label when supplied.
    milestone: Option<String>,
}

/// Records the request audit event and converts the reply into a response.
fn finish(
    state: &ServerState,
    route: &'static str,
    details: RequestDetails,
    reply: Reply,
) -> Response {
    state.audit.record(&HttpAuditEvent::new(HttpAuditEventParams {
        route,
        status: reply.status.as_u16(),
        error_kind: reply.error_kind,
        request_bytes: details.request_bytes,
        response_bytes: reply.body.len(),
        decision: details.decision,
        project_id: details.project_id,
        milestone: details.milestone,
    }));
    (reply.status, [(CONTENT_TYPE, "application/json")], reply.body).into_response()
}

/// Request body as extracted, or the reason it could not be read.
type RequestBody = Result<Bytes, BytesRejection>;

/// Unwraps the extracted body and rejects bodies above the configured limit.
fn read_body(state: &ServerState, body: &RequestBody) -> Result<Bytes, Reply> {
    let too_large =
        || Reply::error(StatusCode::PAYLOAD_TOO_LARGE, "body_too_large", "request body too large");
    match body {
        Ok(bytes) if bytes.len() > state.max_body_bytes => Err(too_large()),
        Ok(bytes) => Ok(bytes.clone()),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(too_large()),
        Err(_) => Err(Reply::error(
            StatusCode::BAD_REQUEST,
            "body_unreadable",
            "request body could not be read",
        )),
    }
}

/// Body size in bytes for audit, zero when the body was rejected.
fn body_len(body: &RequestBody) -> usize {
    body.as_ref().map_or(0, Bytes::len)
}

/// Parses a request body as JSON.
fn parse_json_body(bytes: &Bytes) -> Result<Value, Reply> {
    serde_json::from_slice(bytes.as_ref())
        .map_err(|_| Reply::error(StatusCode::BAD_REQUEST, "invalid_json", "invalid json body"))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `POST /suggest-milestone`.
async fn handle_suggest(State(state): State<Arc<ServerState>>, body: RequestBody) -> Response {
    let mut details = RequestDetails {
        request_bytes: body_len(&body),
        ..RequestDetails::default()
    };
    let reply = suggest(&state, &body, &mut details).unwrap_or_else(|reply| reply);
    finish(&state, routes::SUGGEST, details, reply)
}

/// Evaluates a milestone submission.
fn suggest(
    state: &ServerState,
    body: &RequestBody,
    details: &mut RequestDetails,
) -> Result<Reply, Reply> {
    let bytes = read_body(state, body)?;
    let submission = parse_json_body(&bytes)?;
    let metadata = SubmissionMetadata::from_json(&submission);
    details.project_id = metadata.project_id;
    details.milestone = metadata.milestone;
    let evidence =
        MilestoneEvidence::from_json(&submission, state.coercion).map_err(|err| match err {
            EvidenceError::NotAnObject => {
                Reply::error(StatusCode::BAD_REQUEST, "not_an_object", err.to_string())
            }
            EvidenceError::NonNumeric {
                ..
            } => Reply::error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "non_numeric_evidence",
                err.to_string(),
            ),
        })?;
    let decision: MilestoneDecision = evaluate_milestone(&evidence);
    details.decision = Some(decision.decision);
    Ok(Reply::json(StatusCode::OK, &decision))
}

/// Handles `POST /execute-payout`.
async fn handle_payout(State(state): State<Arc<ServerState>>, body: RequestBody) -> Response {
    let mut details = RequestDetails {
        request_bytes: body_len(&body),
        ..RequestDetails::default()
    };
    let reply = payout(&state, &body, &mut details).unwrap_or_else(|reply| reply);
    finish(&state, routes::PAYOUT, details, reply)
}

/// Records a payout against the ledger.
fn payout(
    state: &ServerState,
    body: &RequestBody,
    details: &mut RequestDetails,
) -> Result<Reply, Reply> {
    let bytes = read_body(state, body)?;
    let body = parse_json_body(&bytes)?;
    let request: PayoutRequest = serde_json::from_value(body).map_err(|err| {
        Reply::error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_payout_request",
            format!("invalid payout request: {err}"),
        )
    })?;
    details.project_id = Some(request.project_id.to_string());
    details.milestone = Some(request.milestone.clone());
    let context = PayoutContext {
        tx_id: generate_tx_id(),
        recorded_at: Timestamp::UnixMillis(now_unix_millis()),
    };
    let outcome = state.ledger.pay_milestone(&request, context).map_err(ledger_error_reply)?;
    state.audit.record_payout(&PayoutAuditEvent::new(&outcome.receipt, outcome.balance_after));
    Ok(Reply::json(StatusCode::OK, &outcome.receipt))
}

/// Handles `GET /balance`.
async fn handle_balance(State(state): State<Arc<ServerState>>) -> Response {
    let reply = match state.ledger.balance() {
        Ok(balance) => Reply::json(StatusCode::OK, &balance),
        Err(err) => ledger_error_reply(err),
    };
    finish(&state, routes::BALANCE, RequestDetails::default(), reply)
}

/// Query parameters for `GET /transactions`.
#[derive(Debug, Deserialize)]
struct TransactionsQuery {
    /// Optional project filter.
    project_id: Option<String>,
}

/// Handles `GET /transactions`.
async fn handle_transactions(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<TransactionsQuery>,
) -> Response {
    let project_id = query.project_id.map(ProjectId::from);
    let reply = match state.ledger.transactions(project_id.as_ref()) {
        Ok(receipts) => Reply::json(StatusCode::OK, &receipts),
        Err(err) => ledger_error_reply(err),
    };
    let details = RequestDetails {
        project_id: project_id.map(|id| id.to_string()),
        ..RequestDetails::default()
    };
    finish(&state, routes::TRANSACTIONS, details, reply)
}

/// Handles `GET /summary`.
async fn handle_summary(State(state): State<Arc<ServerState>>) -> Response {
    let summary = state
        .ledger
        .transactions(None)
        .and_then(|receipts| Ok(summarize_ledger(&receipts, &state.ledger.balance()?)));
    let reply = match summary {
        Ok(summary) => Reply::json(StatusCode::OK, &summary),
        Err(err) => ledger_error_reply(err),
    };
    finish(&state, routes::SUMMARY, RequestDetails::default(), reply)
}

/// Handles `GET /projects/{project_id}/status`.
async fn handle_project_status(
    State(state): State<Arc<ServerState>>,
    RoutePath(project_id): RoutePath<String>,
) -> Response {
    let project_id = ProjectId::from(project_id);
    let reply = match state.ledger.transactions(Some(&project_id)) {
        Ok(receipts) => Reply::json(StatusCode::OK, &project_status(&project_id, &receipts)),
        Err(err) => ledger_error_reply(err),
    };
    let details = RequestDetails {
        project_id: Some(project_id.to_string()),
        ..RequestDetails::default()
    };
    finish(&state, routes::PROJECT_STATUS, details, reply)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps ledger failures to HTTP replies.
fn ledger_error_reply(error: LedgerError) -> Reply {
    let message = error.to_string();
    match error {
        LedgerError::InsufficientFunds {
            available,
            ..
        } => Reply::error_body(StatusCode::CONFLICT, "insufficient_funds", ErrorBody {
            error: message,
            available_balance: Some(available),
        }),
        LedgerError::InvalidRequest(_) => {
            Reply::error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_payout_request", message)
        }
        LedgerError::Store(_) => {
            Reply::error(StatusCode::INTERNAL_SERVER_ERROR, "ledger_unavailable", message)
        }
    }
}

/// Generates a `mock_tx_` identifier with eight lower-case hex digits.
fn generate_tx_id() -> TransactionId {
    TransactionId::new(format!("{TX_ID_PREFIX}{:08x}", rand::random::<u32>()))
}

/// Current wall-clock time in Unix milliseconds.
fn now_unix_millis() -> i64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    i64::try_from(millis).unwrap_or(i64::MAX)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
