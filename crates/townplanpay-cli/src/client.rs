// crates/townplanpay-cli/src/client.rs
// ============================================================================
// Module: Suggestion Client
// Description: HTTP client for a running TownPlanPay suggestion service.
// Purpose: Submit evidence and decode the service decision for the CLI.
// Dependencies: reqwest, serde, serde_json, thiserror, townplanpay-core
// ============================================================================

//! ## Overview
//! [`SuggestClient`] posts one evidence document to `/suggest-milestone` and
//! decodes the [`MilestoneDecision`] reply. Any failure between the caller and
//! a well-formed decision is a [`SuggestError`]; callers render it to users as
//! [`ErrorDecision`], the caller-side `error` decision variant.
//!
//! Response bodies are read incrementally and abandoned once they exceed
//! [`MAX_RESPONSE_BYTES`], or up front when the declared length does.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Client;
use reqwest::Response;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use townplanpay_core::MilestoneDecision;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Route the service exposes for milestone suggestions.
pub const SUGGEST_PATH: &str = "/suggest-milestone";
/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Maximum accepted response body size in bytes.
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024;
/// Explanation carried by the caller-side error decision.
pub const CONNECTION_ERROR_EXPLANATION: &str = "Error connecting to AI service. Please try again.";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Caller-side decision reported when the service cannot be reached.
///
/// Serializes as
/// `{"decision":"error","explanation":"Error connecting to AI service. Please try again.","confidence":0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorDecision {
    /// Always `error`.
    pub decision: &'static str,
    /// Fixed user-facing explanation.
    pub explanation: &'static str,
    /// Always zero.
    pub confidence: u8,
}

impl ErrorDecision {
    /// Returns the connection error decision.
    #[must_use]
    pub const fn connection() -> Self {
        Self {
            decision: "error",
            explanation: CONNECTION_ERROR_EXPLANATION,
            confidence: 0,
        }
    }
}

/// Failures while requesting a suggestion.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(String),
    /// Request could not be sent or the response could not be read.
    #[error("request to {url} failed: {error}")]
    Transport {
        /// Target URL.
        url: String,
        /// Transport error detail.
        error: String,
    },
    /// Service replied with a non-success status.
    #[error("service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },
    /// Response body exceeded [`MAX_RESPONSE_BYTES`].
    #[error("response exceeds size limit ({actual} > {limit})")]
    TooLarge {
        /// Declared length, or bytes received when reading stopped.
        actual: usize,
        /// Allowed size.
        limit: usize,
    },
    /// Response body was not a decision document.
    #[error("invalid decision response: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client bound to one suggestion endpoint.
#[derive(Debug, Clone)]
pub struct SuggestClient {
    /// Fully resolved endpoint URL.
    url: String,
    /// Underlying HTTP client.
    client: Client,
}

impl SuggestClient {
    /// Builds a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError::Client`] when the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SuggestError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| SuggestError::Client(err.to_string()))?;
        Ok(Self {
            url: suggest_url(base_url),
            client,
        })
    }

    /// Returns the endpoint this client posts to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts `evidence` and decodes the service decision.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError`] on transport failure, a non-success status,
    /// an oversized body, or a body that is not a decision.
    pub async fn suggest(&self, evidence: &Value) -> Result<MilestoneDecision, SuggestError> {
        let mut response =
            self.client.post(&self.url).json(evidence).send().await.map_err(|err| {
                SuggestError::Transport {
                    url: self.url.clone(),
                    error: err.to_string(),
                }
            })?;
        let status = response.status();
        let bytes = self.read_body_with_limit(&mut response).await?;
        if !status.is_success() {
            return Err(SuggestError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(|err| SuggestError::Decode(err.to_string()))
    }

    /// Reads the response body chunk by chunk, stopping at [`MAX_RESPONSE_BYTES`].
    async fn read_body_with_limit(
        &self,
        response: &mut Response,
    ) -> Result<Vec<u8>, SuggestError> {
        if let Some(length) = response.content_length() {
            let length = usize::try_from(length).unwrap_or(usize::MAX);
            if length > MAX_RESPONSE_BYTES {
                return Err(SuggestError::TooLarge {
                    actual: length,
                    limit: MAX_RESPONSE_BYTES,
                });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|err| SuggestError::Transport {
            url: self.url.clone(),
            error: format!("failed to read response body: {err}"),
        })? {
            let next_len = body.len().saturating_add(chunk.len());
            if next_len > MAX_RESPONSE_BYTES {
                return Err(SuggestError::TooLarge {
                    actual: next_len,
                    limit: MAX_RESPONSE_BYTES,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

/// Resolves the suggestion endpoint for a service base URL.
///
/// A URL that already ends in [`SUGGEST_PATH`] is used as given.
#[must_use]
pub fn suggest_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.ends_with(SUGGEST_PATH) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{SUGGEST_PATH}")
    }
}
