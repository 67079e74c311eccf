//! Terminal chat client for the webhook chat proxy.
//!
//! Run with: `cargo run --bin webhook-chat`
//!
//! - Any line is sent as a chat turn
//! - `/new` starts a new chat
//! - `/quit` exits

use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};

use webhook_chat::chat::{
    HttpTransport, Message, Rejection, Sender, SubmitOutcome, TurnController,
};
use webhook_chat::config::proxy_url_from_env;
use webhook_chat::start_webhook_chat::init_tracing;

/// Print one chat bubble.
fn render(message: &Message) {
    let who = match message.sender() {
        Sender::User => "You",
        Sender::Bot => "Mark",
    };
    println!("  [{}] {who}: {}", message.timestamp().format("%H:%M"), message.content());
}

/// Print the whole conversation, used after a reset.
fn render_all(controller: &TurnController<HttpTransport>) {
    for message in controller.messages() {
        render(&message);
    }
}

async fn chat_loop(controller: &TurnController<HttpTransport>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/new" => {
                controller.reset();
                println!();
                println!("  ── new chat ──");
                render_all(controller);
                continue;
            }
            _ => {}
        }

        println!("  Mark is thinking...");
        match controller.submit(&line).await {
            SubmitOutcome::Replied(reply) | SubmitOutcome::Failed(reply) => render(&reply),
            SubmitOutcome::Rejected(Rejection::EmptyInput) | SubmitOutcome::Stale => {}
            SubmitOutcome::Rejected(Rejection::Busy) => println!("  Still waiting for Mark..."),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let proxy_url = proxy_url_from_env();
    let transport = match HttpTransport::new(&proxy_url) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("  Invalid proxy URL {proxy_url}: {e}");
            return ExitCode::from(1);
        }
    };
    let controller = TurnController::new(transport);

    println!();
    println!("  Webhook chat ({proxy_url})");
    println!("  /new starts a new chat, /quit exits");
    println!();
    render_all(&controller);

    if let Err(e) = chat_loop(&controller).await {
        eprintln!("  Input error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}
