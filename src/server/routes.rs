//! HTTP route handlers for the chat proxy.

use std::borrow::Cow;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProxyError;
use super::state::{AppState, Delivery};
use crate::chat::transport::SEND_MESSAGE_ACTION;
use crate::fallback::input_from_body;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/proxy", post(proxy))
        .route("/api/n8n-chat", post(proxy))
        .route("/api/chat", post(fallback_chat))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "webhook-chat",
        "delivery": state.mode().to_string(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// First `action` parameter of `query`, `sendMessage` when absent or empty.
///
/// Repeated or unknown parameters are ignored rather than rejected.
fn action_from_query(query: Option<&str>) -> Cow<'_, str> {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "action")
                .map(|(_, value)| value)
        })
        .filter(|action| !action.is_empty())
        .unwrap_or(Cow::Borrowed(SEND_MESSAGE_ACTION))
}

/// Reply of the keyword responder.
#[derive(Debug, Serialize, Deserialize)]
pub struct FallbackReply {
    /// Canned text.
    pub response: String,
}

/// Forward a chat turn and relay the reply verbatim.
///
/// The query and body are parsed by hand so malformed ones still yield the
/// failure envelope rather than an extractor rejection.
async fn proxy(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let body: Value = serde_json::from_slice(&body)?;
    let action = action_from_query(query.as_deref());

    match &state.delivery {
        Delivery::Webhook(forwarder) => {
            tracing::info!("Forwarding action {action} to webhook");
            Ok(Json(forwarder.forward(&action, &body).await?))
        }
        Delivery::Fallback => {
            tracing::debug!("Answering action {action} locally");
            let response = state.fallback.respond(input_from_body(&body)).await;
            Ok(Json(serde_json::json!({ "response": response })))
        }
    }
}

/// Keyword responder endpoint, independent of the delivery mode.
async fn fallback_chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<FallbackReply>, ProxyError> {
    let body: Value = serde_json::from_slice(&body)?;
    let response = state.fallback.respond(input_from_body(&body)).await;
    Ok(Json(FallbackReply {
        response: response.to_string(),
    }))
}
