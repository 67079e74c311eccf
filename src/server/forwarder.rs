//! Relay to the downstream webhook.

use serde_json::Value;
use url::Url;

use super::error::ForwardError;
use crate::config::WebhookAuth;

/// Posts chat turns to the configured webhook and returns its JSON verbatim.
///
/// One best-effort call per request: no retry, no timeout beyond the client
/// defaults.
pub struct WebhookForwarder {
    client: reqwest::Client,
    base_url: Url,
    auth: Option<WebhookAuth>,
}

impl WebhookForwarder {
    /// Create a forwarder for `base_url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: Url, auth: Option<WebhookAuth>) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ForwardError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// Configured webhook base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Webhook URL with `action` appended as a query parameter.
    ///
    /// Query parameters already on the base URL are kept.
    #[must_use]
    pub fn target_url(&self, action: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("action", action);
        url
    }

    /// Forward `body` with the given `action`.
    ///
    /// The downstream status code is not interpreted: any JSON body is
    /// relayed as-is.
    ///
    /// # Errors
    /// Returns an error on network failure or when the webhook answers with
    /// something other than JSON.
    pub async fn forward(&self, action: &str, body: &Value) -> Result<Value, ForwardError> {
        let mut request = self.client.post(self.target_url(action)).json(body);
        if let Some(auth) = &self.auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Webhook answered {status} for action {action}");
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ForwardError::MalformedResponse)
    }
}
