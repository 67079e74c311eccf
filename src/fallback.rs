//! Canned keyword responder used when no downstream webhook is wired up.

use std::time::Duration;

use serde_json::Value;

/// Default simulated processing time.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Greeting reply.
pub const GREETING_REPLY: &str =
    "Hello there! How can I help you with climate change solutions today?";
/// Climate reply.
pub const CLIMATE_REPLY: &str = "Climate change is a critical issue that requires immediate action. Solutions include renewable energy, reducing carbon emissions, and sustainable practices.";
/// Renewable-energy reply.
pub const RENEWABLE_REPLY: &str = "Renewable energy sources like solar and wind power are essential alternatives to fossil fuels. They help reduce carbon emissions and combat climate change.";
/// Carbon reply.
pub const CARBON_REPLY: &str = "Reducing carbon emissions is crucial for mitigating climate change. This can be achieved through renewable energy, energy efficiency, and sustainable transportation.";
/// Reply when no keyword matches.
pub const GENERIC_REPLY: &str = "Thank you for your message. I'm an AI assistant focused on climate change solutions. Is there something specific you'd like to know about climate action?";

/// Keyword groups, checked in order. First group with a substring hit wins.
const KEYWORD_GROUPS: [(&[&str], &str); 4] = [
    (&["hello", "hi"], GREETING_REPLY),
    (&["climate", "global warming"], CLIMATE_REPLY),
    (&["renewable", "solar", "wind"], RENEWABLE_REPLY),
    (&["carbon", "emissions"], CARBON_REPLY),
];

/// Pick the canned reply for `input`. Case-insensitive substring match.
#[must_use]
pub fn canned_reply(input: &str) -> &'static str {
    let lowered = input.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(*k)))
        .map_or(GENERIC_REPLY, |(_, reply)| *reply)
}

/// Text to answer from a request body: `chatInput`, else `message`, else empty.
#[must_use]
pub fn input_from_body(body: &Value) -> &str {
    ["chatInput", "message"]
        .iter()
        .find_map(|field| body.get(field).and_then(Value::as_str))
        .unwrap_or_default()
}

/// Keyword responder with simulated latency.
#[derive(Clone, Copy, Debug)]
pub struct FallbackResponder {
    delay: Duration,
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl FallbackResponder {
    /// Create a responder that waits `delay` before answering.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Answer `input` after the configured delay.
    pub async fn respond(&self, input: &str) -> &'static str {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        canned_reply(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_groups() {
        assert_eq!(canned_reply("hello"), GREETING_REPLY);
        assert_eq!(canned_reply("tell me about solar power"), RENEWABLE_REPLY);
        assert_eq!(canned_reply("xyz"), GENERIC_REPLY);
        assert_eq!(canned_reply("What about GLOBAL WARMING?"), CLIMATE_REPLY);
        assert_eq!(canned_reply("cut emissions"), CARBON_REPLY);
    }

    #[test]
    fn test_first_group_wins() {
        // "climate" and "solar" both match; climate is checked first.
        assert_eq!(canned_reply("climate and solar"), CLIMATE_REPLY);
        // "hi" hides inside "this", so the greeting group wins.
        assert_eq!(canned_reply("this wind farm"), GREETING_REPLY);
    }

    #[test]
    fn test_input_from_body() {
        let body = serde_json::json!({"chatInput": "solar", "message": "hello"});
        assert_eq!(input_from_body(&body), "solar");
        assert_eq!(input_from_body(&serde_json::json!({"message": "hello"})), "hello");
        assert_eq!(input_from_body(&serde_json::json!({"chatInput": 3})), "");
    }

    #[tokio::test]
    async fn test_respond_without_delay() {
        let responder = FallbackResponder::new(Duration::ZERO);
        assert_eq!(responder.respond("carbon").await, CARBON_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_respond_waits_for_delay() {
        let responder = FallbackResponder::default();
        let started = tokio::time::Instant::now();
        assert_eq!(responder.respond("hi").await, GREETING_REPLY);
        assert!(started.elapsed() >= DEFAULT_DELAY);
    }
}
