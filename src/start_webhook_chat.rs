//! Startup helpers for the webhook chat proxy.

use std::process::ExitCode;
use std::sync::Arc;

use crate::config::{AppConfig, DeliveryMode};
use crate::server::{self, AppState};

/// Install the global `tracing` subscriber (`RUST_LOG` aware, INFO by default).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
}

/// Run the proxy server (used by the `webhook-chat-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();

    tracing::info!("Starting webhook chat proxy v{}", env!("CARGO_PKG_VERSION"));

    let (config, state) = match initialize() {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::run_server_with_shutdown(
        state,
        config.port,
        shutdown_signal(),
    )) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    tracing::info!("Webhook chat proxy stopped");
    ExitCode::SUCCESS
}

/// Load the configuration and build the application state without serving.
///
/// # Errors
/// Returns an error if the environment is misconfigured.
pub fn initialize() -> Result<(AppConfig, Arc<AppState>), Box<dyn std::error::Error + Send + Sync>> {
    let config =
        AppConfig::from_env().map_err(|e| format!("Failed to load configuration: {e}"))?;

    match (config.delivery, &config.webhook_url) {
        (DeliveryMode::Webhook, Some(url)) => {
            tracing::info!("Webhook endpoint: {}{}", url.origin().ascii_serialization(), url.path());
            if let Some(auth) = &config.auth {
                tracing::info!("Webhook basic auth enabled for user {}", auth.username);
            }
        }
        _ => tracing::warn!("Webhook delivery disabled, answering with the keyword responder"),
    }

    let state =
        AppState::from_config(&config).map_err(|e| format!("Failed to create state: {e}"))?;
    Ok((config, state))
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
