//! Turning a proxy reply body into bot text.

use serde_json::Value;

/// Reply fields checked in priority order.
pub const REPLY_FIELDS: [&str; 3] = ["response", "output", "message"];

/// Shown when the reply carries none of [`REPLY_FIELDS`].
pub const UNPROCESSABLE_REPLY: &str = "Sorry, I could not process your request.";

/// Shown when the proxy could not be reached or answered with an error status.
pub const CONNECTION_ERROR_REPLY: &str = "Sorry, there was an error connecting to the server.";

/// Pick the bot text out of an opaque reply body.
///
/// The first field holding a non-empty string wins; anything else (missing,
/// `null`, empty, non-string) is skipped.
#[must_use]
pub fn extract_reply(body: &Value) -> String {
    REPLY_FIELDS
        .iter()
        .filter_map(|field| body.get(field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or(UNPROCESSABLE_REPLY)
        .to_string()
}
