//! Outbound call from the chat client to the proxy.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::ids::SessionId;

/// Boxed future type for transport calls.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Default proxy base URL used by the terminal client.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

/// Action sent with every chat turn.
pub const SEND_MESSAGE_ACTION: &str = "sendMessage";

/// Body of one chat turn as seen by the proxy and the downstream webhook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Session the turn belongs to.
    pub session_id: SessionId,
    /// Text typed by the user.
    pub chat_input: String,
}

/// Errors raised while delivering a turn to the proxy.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network failure or undecodable body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy answered with a non-2xx status.
    #[error("proxy returned status {0}")]
    Status(u16),

    /// The proxy base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Delivers a [`ChatRequest`] and returns the raw JSON reply.
pub trait ChatTransport: Send + Sync {
    /// Send one turn. Exactly one outbound call per invocation, no retries.
    fn send<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> TransportFuture<'a, Result<Value, TransportError>>;
}

/// [`ChatTransport`] talking to the proxy over HTTP.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Build a transport for the proxy at `proxy_base`.
    ///
    /// Requests go to `<proxy_base>/proxy?action=sendMessage`, keeping any
    /// path prefix of the base. No timeout is configured beyond the client
    /// defaults.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(proxy_base: &str) -> Result<Self, TransportError> {
        let mut base = Url::parse(proxy_base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut endpoint = base.join("proxy")?;
        endpoint
            .query_pairs_mut()
            .append_pair("action", SEND_MESSAGE_ACTION);
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, endpoint })
    }

    /// Full endpoint URL, action included.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ChatTransport for HttpTransport {
    fn send<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> TransportFuture<'a, Result<Value, TransportError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoint.clone())
                .json(request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }

            Ok(response.json::<Value>().await?)
        })
    }
}
