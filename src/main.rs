//! Binary entrypoint that runs the webhook chat proxy.

use std::process::ExitCode;

use webhook_chat::start_webhook_chat;

/// Start the proxy using environment configuration.
fn main() -> ExitCode {
    start_webhook_chat::run()
}
