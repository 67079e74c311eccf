//! Chat message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::MessageId;

/// Author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person chatting.
    User,
    /// Produced by the downstream workflow (or a fixed client-side string).
    Bot,
}

/// A single chat bubble.
///
/// Fields are read-only once built; the only way to "change" a pending
/// placeholder is to replace it in the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    content: String,
    sender: Sender,
    /// Display only, never used for ordering.
    timestamp: DateTime<Utc>,
    pending: bool,
}

impl Message {
    /// Build a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::build(content.into(), Sender::User, false)
    }

    /// Build a resolved bot message.
    #[must_use]
    pub fn bot(content: impl Into<String>) -> Self {
        Self::build(content.into(), Sender::Bot, false)
    }

    /// Build the empty bot placeholder shown while a reply is in flight.
    #[must_use]
    pub fn pending() -> Self {
        Self::build(String::new(), Sender::Bot, true)
    }

    fn build(content: String, sender: Sender, pending: bool) -> Self {
        Self {
            id: MessageId::new(),
            content,
            sender,
            timestamp: Utc::now(),
            pending,
        }
    }

    /// Message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Text body. Empty only for a pending placeholder.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Author.
    #[must_use]
    pub const fn sender(&self) -> Sender {
        self.sender
    }

    /// Creation time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether this is the placeholder of an in-flight turn.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}
