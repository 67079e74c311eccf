//! Error types for the proxy.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `error` field of the failure envelope.
pub const ENVELOPE_ERROR: &str = "Failed to process request";
/// `response` field of the failure envelope.
pub const ENVELOPE_RESPONSE: &str = "Sorry, there was an error connecting to the service.";

/// Errors raised while calling the downstream webhook.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Network failure talking to the webhook.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The webhook answered with something that is not JSON.
    #[error("Malformed webhook response: {0}")]
    MalformedResponse(serde_json::Error),
}

/// Anything that makes a proxy request fail.
///
/// Every variant renders the same fixed envelope with status 500; the
/// variants only differ in what gets logged.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The client body was not JSON.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// The downstream call failed.
    #[error("Forwarding failed: {0}")]
    Forward(#[from] ForwardError),
}

/// Failure body returned to the chat client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Machine-facing summary.
    pub error: String,
    /// User-facing text, readable through the normal reply field.
    pub response: String,
}

impl Default for ErrorEnvelope {
    fn default() -> Self {
        Self {
            error: ENVELOPE_ERROR.to_string(),
            response: ENVELOPE_RESPONSE.to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!("Error proxying request: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorEnvelope::default())).into_response()
    }
}
