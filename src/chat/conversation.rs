//! In-memory conversation store.
//!
//! The sequence always starts with exactly one bot welcome message. It is
//! append-only except for [`Conversation::replace_pending`], which swaps a
//! placeholder for its resolved reply in a single `&mut self` call so no
//! observer can see the intermediate state.

use super::ids::MessageId;
use super::message::Message;

/// Text of the bot message every conversation starts with.
pub const WELCOME_MESSAGE: &str = "Hi, I am Mark. What can I help you with?";

/// Ordered list of messages for one chat session.
#[derive(Clone, Debug)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Create a conversation holding only the welcome message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![Message::bot(WELCOME_MESSAGE)],
        }
    }

    /// Add a message at the tail.
    ///
    /// Returns `false` (and leaves the list untouched) if a message with the
    /// same id is already present.
    pub fn append(&mut self, message: Message) -> bool {
        if self.contains(message.id()) {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Remove the message `id` and append `resolved` in one update.
    ///
    /// Returns `false` without appending when `id` is no longer present,
    /// which is how a reply that lands after a reset gets dropped.
    pub fn replace_pending(&mut self, id: MessageId, resolved: Message) -> bool {
        let Some(index) = self.messages.iter().position(|m| m.id() == id) else {
            return false;
        };
        if resolved.id() != id && self.contains(resolved.id()) {
            return false;
        }
        self.messages.remove(index);
        self.messages.push(resolved);
        true
    }

    /// Discard everything and start over with a fresh welcome message.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::bot(WELCOME_MESSAGE));
    }

    /// Messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages, welcome included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always `false`: the welcome message is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop the message `id`. Returns `false` if it was not present.
    pub fn remove(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id() != id);
        self.messages.len() != before
    }

    /// Whether a message with `id` is present.
    #[must_use]
    pub fn contains(&self, id: MessageId) -> bool {
        self.messages.iter().any(|m| m.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::Sender;

    #[test]
    fn test_new_starts_with_welcome() {
        let conversation = Conversation::new();
        assert_eq!(conversation.len(), 1);
        let first = &conversation.messages()[0];
        assert_eq!(first.sender(), Sender::Bot);
        assert_eq!(first.content(), WELCOME_MESSAGE);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut conversation = Conversation::new();
        assert!(conversation.append(Message::user("one")));
        assert!(conversation.append(Message::user("two")));

        let contents: Vec<&str> = conversation.messages().iter().map(Message::content).collect();
        assert_eq!(contents, vec![WELCOME_MESSAGE, "one", "two"]);
    }

    #[test]
    fn test_append_rejects_duplicate_id() {
        let mut conversation = Conversation::new();
        let message = Message::user("once");
        assert!(conversation.append(message.clone()));
        assert!(!conversation.append(message));
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn test_replace_pending_moves_reply_to_tail() {
        let mut conversation = Conversation::new();
        let placeholder = Message::pending();
        let pending_id = placeholder.id();
        conversation.append(Message::user("question"));
        conversation.append(placeholder);

        assert!(conversation.replace_pending(pending_id, Message::bot("answer")));
        assert!(!conversation.messages().iter().any(Message::is_pending));
        assert!(!conversation.contains(pending_id));
        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.messages()[2].content(), "answer");
    }

    #[test]
    fn test_remove_placeholder() {
        let mut conversation = Conversation::new();
        let placeholder = Message::pending();
        let pending_id = placeholder.id();
        conversation.append(Message::user("question"));
        conversation.append(placeholder);

        assert!(conversation.remove(pending_id));
        assert!(!conversation.remove(pending_id));
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.messages()[1].content(), "question");
    }

    #[test]
    fn test_replace_pending_missing_id_is_noop() {
        let mut conversation = Conversation::new();
        let placeholder = Message::pending();
        let pending_id = placeholder.id();
        conversation.append(placeholder);
        conversation.reset();

        assert!(!conversation.replace_pending(pending_id, Message::bot("late")));
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].content(), WELCOME_MESSAGE);
    }

    #[test]
    fn test_reset_yields_fresh_welcome() {
        let mut conversation = Conversation::new();
        let original_welcome = conversation.messages()[0].id();
        conversation.append(Message::user("hello"));
        conversation.append(Message::pending());

        conversation.reset();

        assert_eq!(conversation.len(), 1);
        assert!(!conversation.is_empty());
        assert_eq!(conversation.messages()[0].content(), WELCOME_MESSAGE);
        assert_ne!(conversation.messages()[0].id(), original_welcome);
    }
}
