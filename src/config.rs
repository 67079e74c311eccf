//! Environment configuration for the proxy and the chat client.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::chat::transport::DEFAULT_PROXY_URL;
use crate::fallback::DEFAULT_DELAY;

/// Downstream webhook base URL.
pub const WEBHOOK_URL_ENV: &str = "N8N_WEBHOOK_URL";
/// Optional basic-auth username for the webhook.
pub const WEBHOOK_USERNAME_ENV: &str = "WEBHOOK_AUTH_USERNAME";
/// Optional basic-auth password for the webhook.
pub const WEBHOOK_PASSWORD_ENV: &str = "WEBHOOK_AUTH_PASSWORD";
/// Proxy listen port.
pub const PORT_ENV: &str = "WEBHOOK_CHAT_PORT";
/// `webhook` or `fallback`.
pub const DELIVERY_ENV: &str = "WEBHOOK_CHAT_DELIVERY";
/// Fallback responder delay in milliseconds.
pub const FALLBACK_DELAY_ENV: &str = "WEBHOOK_CHAT_FALLBACK_DELAY_MS";
/// Proxy base URL used by the terminal client.
pub const PROXY_URL_ENV: &str = "WEBHOOK_CHAT_PROXY_URL";

/// Default proxy listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Webhook delivery selected but no URL configured.
    #[error("N8N_WEBHOOK_URL must be set when delivery mode is `webhook`")]
    MissingWebhookUrl,

    /// Webhook URL present but unusable.
    #[error("Invalid webhook URL: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),

    /// Port is not a valid `u16`.
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    /// Unknown delivery mode.
    #[error("Invalid delivery mode `{0}` (expected `webhook` or `fallback`)")]
    InvalidDelivery(String),

    /// Delay is not a number of milliseconds.
    #[error("Invalid fallback delay: {0}")]
    InvalidDelay(String),
}

/// Where `/proxy` sends chat turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Forward to the downstream webhook.
    #[default]
    Webhook,
    /// Answer locally with the keyword responder.
    Fallback,
}

impl FromStr for DeliveryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "webhook" => Ok(Self::Webhook),
            "fallback" => Ok(Self::Fallback),
            _ => Err(ConfigError::InvalidDelivery(s.to_string())),
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webhook => write!(f, "webhook"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Basic-auth credentials for the downstream webhook.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookAuth {
    /// Username.
    pub username: String,
    /// Password, possibly empty.
    pub password: String,
}

impl fmt::Debug for WebhookAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Proxy server configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// Delivery mode for `/proxy`.
    pub delivery: DeliveryMode,
    /// Downstream webhook base URL. Required in webhook mode.
    pub webhook_url: Option<Url>,
    /// Downstream credentials.
    pub auth: Option<WebhookAuth>,
    /// Simulated latency of the fallback responder.
    pub fallback_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            delivery: DeliveryMode::default(),
            webhook_url: None,
            auth: None,
            fallback_delay: DEFAULT_DELAY,
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if a variable is malformed or the webhook URL is missing
    /// in webhook mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, treating blank values as unset.
    ///
    /// # Errors
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get(PORT_ENV) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(mode) = get(DELIVERY_ENV) {
            config.delivery = mode.parse()?;
        }
        if let Some(delay) = get(FALLBACK_DELAY_ENV) {
            let millis: u64 = delay
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidDelay(delay.clone()))?;
            config.fallback_delay = Duration::from_millis(millis);
        }
        if let Some(url) = get(WEBHOOK_URL_ENV) {
            config.webhook_url = Some(Url::parse(url.trim())?);
        }
        if let Some(username) = get(WEBHOOK_USERNAME_ENV) {
            config.auth = Some(WebhookAuth {
                username,
                password: lookup(WEBHOOK_PASSWORD_ENV).unwrap_or_default(),
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingWebhookUrl`] in webhook mode without a URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.delivery, DeliveryMode::Webhook) && self.webhook_url.is_none() {
            return Err(ConfigError::MissingWebhookUrl);
        }
        Ok(())
    }

    /// Set the listen port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Forward to `url`.
    #[must_use]
    pub fn with_webhook(mut self, url: Url) -> Self {
        self.delivery = DeliveryMode::Webhook;
        self.webhook_url = Some(url);
        self
    }

    /// Answer locally instead of forwarding.
    #[must_use]
    pub const fn with_fallback(mut self, delay: Duration) -> Self {
        self.delivery = DeliveryMode::Fallback;
        self.fallback_delay = delay;
        self
    }

    /// Set basic-auth credentials for the webhook.
    #[must_use]
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(WebhookAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }
}

/// Proxy base URL for the terminal client.
#[must_use]
pub fn proxy_url_from_env() -> String {
    std::env::var(PROXY_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_webhook_mode_requires_url() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingWebhookUrl)));
    }

    #[test]
    fn test_blank_url_counts_as_missing() {
        let result = AppConfig::from_lookup(lookup_from(&[(WEBHOOK_URL_ENV, "  ")]));
        assert!(matches!(result, Err(ConfigError::MissingWebhookUrl)));
    }

    #[test]
    fn test_invalid_url() {
        let result = AppConfig::from_lookup(lookup_from(&[(WEBHOOK_URL_ENV, "YOUR_N8N_WEBHOOK_URL")]));
        assert!(matches!(result, Err(ConfigError::InvalidWebhookUrl(_))));
    }

    #[test]
    fn test_full_webhook_config() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (WEBHOOK_URL_ENV, "https://n8n.example.com/webhook/abc/chat"),
            (WEBHOOK_USERNAME_ENV, "bot"),
            (WEBHOOK_PASSWORD_ENV, "secret"),
            (PORT_ENV, "8080"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.delivery, DeliveryMode::Webhook);
        assert_eq!(
            config.webhook_url.as_ref().map(Url::as_str),
            Some("https://n8n.example.com/webhook/abc/chat")
        );
        let auth = config.auth.unwrap();
        assert_eq!(auth.username, "bot");
        assert_eq!(auth.password, "secret");
        assert!(!format!("{auth:?}").contains("secret"));
    }

    #[test]
    fn test_fallback_mode_without_url() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (DELIVERY_ENV, "Fallback"),
            (FALLBACK_DELAY_ENV, "250"),
        ]))
        .unwrap();

        assert_eq!(config.delivery, DeliveryMode::Fallback);
        assert_eq!(config.fallback_delay, Duration::from_millis(250));
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_malformed_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[(DELIVERY_ENV, "fallback"), (PORT_ENV, "99999")])),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[(DELIVERY_ENV, "carrier-pigeon")])),
            Err(ConfigError::InvalidDelivery(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&[
                (DELIVERY_ENV, "fallback"),
                (FALLBACK_DELAY_ENV, "soon")
            ])),
            Err(ConfigError::InvalidDelay(_))
        ));
    }

    #[test]
    fn test_builder() {
        let url = Url::parse("http://localhost:5678/webhook/chat").unwrap();
        let config = AppConfig::default()
            .with_port(4000)
            .with_webhook(url.clone())
            .with_auth("user", "pw");

        assert!(config.validate().is_ok());
        assert_eq!(config.port, 4000);
        assert_eq!(config.webhook_url, Some(url));
        assert!(config.auth.is_some());

        let config = config.with_fallback(Duration::ZERO);
        assert_eq!(config.delivery, DeliveryMode::Fallback);
    }
}
