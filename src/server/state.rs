//! Application state shared across all request handlers.

use std::sync::Arc;

use super::error::ForwardError;
use super::forwarder::WebhookForwarder;
use crate::config::{AppConfig, ConfigError, DeliveryMode};
use crate::fallback::FallbackResponder;

/// How `/proxy` answers chat turns.
pub enum Delivery {
    /// Relay to the downstream webhook.
    Webhook(WebhookForwarder),
    /// Answer locally with the keyword responder.
    Fallback,
}

/// Shared application state. Read-only after startup.
pub struct AppState {
    /// Delivery used by `/proxy`.
    pub delivery: Delivery,
    /// Keyword responder, also served on `/api/chat`.
    pub fallback: FallbackResponder,
}

/// Errors raised while building the state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Configuration is inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The webhook client could not be built.
    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl AppState {
    /// Build the state from a validated configuration.
    ///
    /// # Errors
    /// Returns an error if webhook delivery has no URL or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>, StateError> {
        config.validate()?;
        let fallback = FallbackResponder::new(config.fallback_delay);

        let delivery = match (config.delivery, &config.webhook_url) {
            (DeliveryMode::Webhook, Some(url)) => {
                Delivery::Webhook(WebhookForwarder::new(url.clone(), config.auth.clone())?)
            }
            (DeliveryMode::Webhook, None) => return Err(ConfigError::MissingWebhookUrl.into()),
            (DeliveryMode::Fallback, _) => Delivery::Fallback,
        };

        Ok(Arc::new(Self { delivery, fallback }))
    }

    /// Delivery mode in effect.
    #[must_use]
    pub const fn mode(&self) -> DeliveryMode {
        match self.delivery {
            Delivery::Webhook(_) => DeliveryMode::Webhook,
            Delivery::Fallback => DeliveryMode::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use super::*;

    #[test]
    fn test_webhook_state() {
        let config = AppConfig::default()
            .with_webhook(Url::parse("http://localhost:5678/webhook/chat").unwrap());
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.mode(), DeliveryMode::Webhook);
    }

    #[test]
    fn test_fallback_state() {
        let config = AppConfig::default().with_fallback(Duration::from_millis(5));
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.mode(), DeliveryMode::Fallback);
        assert_eq!(state.fallback.delay(), Duration::from_millis(5));
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let result = AppState::from_config(&AppConfig::default());
        assert!(matches!(
            result,
            Err(StateError::Config(ConfigError::MissingWebhookUrl))
        ));
    }
}
