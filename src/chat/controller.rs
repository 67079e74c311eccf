//! Turn controller: drives one chat turn from user input to bot reply.
//!
//! A turn goes `Idle -> AwaitingReply -> Idle`. While a turn is awaiting its
//! reply every further `submit` is rejected, so at most one request is in
//! flight and at most one pending placeholder exists.
//!
//! The user message and the pending placeholder are appended in the same
//! locked update, which orders the user bubble before the placeholder
//! without a timer.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::conversation::Conversation;
use super::ids::{MessageId, SessionId};
use super::message::Message;
use super::reply::{extract_reply, CONNECTION_ERROR_REPLY};
use super::transport::{ChatRequest, ChatTransport};

/// Turn state of a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    /// No request in flight; input accepted.
    Idle,
    /// A request is in flight for the placeholder `pending`.
    AwaitingReply {
        /// Id of the placeholder that the reply will replace.
        pending: MessageId,
    },
}

/// Why a submission was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Input was empty or whitespace only.
    EmptyInput,
    /// A turn is already awaiting its reply.
    Busy,
}

/// Result of [`TurnController::submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reply replaced the placeholder.
    Replied(Message),
    /// The call failed; the fixed error message replaced the placeholder.
    Failed(Message),
    /// The conversation was reset while waiting; the reply was dropped.
    Stale,
    /// Nothing happened.
    Rejected(Rejection),
}

struct Session {
    conversation: Conversation,
    state: TurnState,
}

/// Owns the conversation and the turn state for one chat session.
pub struct TurnController<T> {
    transport: T,
    session_id: SessionId,
    session: Mutex<Session>,
}

/// Returns the controller to `Idle` when the turn ends, however it ends.
///
/// A placeholder still present at that point belongs to an abandoned turn
/// and is removed with it.
struct IdleOnDrop<'a> {
    session: &'a Mutex<Session>,
    pending: MessageId,
}

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        let mut session = lock(self.session);
        if session.conversation.remove(self.pending) {
            tracing::debug!("Removed placeholder {} of an abandoned turn", self.pending);
        }
        session.state = TurnState::Idle;
    }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: ChatTransport> TurnController<T> {
    /// Create a controller with a fresh session and a welcome-only conversation.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session_id: SessionId::new(),
            session: Mutex::new(Session {
                conversation: Conversation::new(),
                state: TurnState::Idle,
            }),
        }
    }

    /// Run one turn for `text`.
    ///
    /// Empty input and input arriving while another turn is in flight are
    /// ignored. Otherwise exactly one request is sent and the placeholder is
    /// resolved with the reply text or with [`CONNECTION_ERROR_REPLY`].
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let (pending, request) = match self.begin_turn(text) {
            Ok(started) => started,
            Err(rejection) => return SubmitOutcome::Rejected(rejection),
        };
        let _idle = IdleOnDrop {
            session: &self.session,
            pending,
        };

        let (resolved, failed) = match self.transport.send(&request).await {
            Ok(body) => (Message::bot(extract_reply(&body)), false),
            Err(e) => {
                tracing::warn!("Chat turn failed for session {}: {e}", self.session_id);
                (Message::bot(CONNECTION_ERROR_REPLY), true)
            }
        };

        let mut session = lock(&self.session);
        if !session
            .conversation
            .replace_pending(pending, resolved.clone())
        {
            tracing::debug!("Dropping reply for placeholder {pending}: conversation was reset");
            return SubmitOutcome::Stale;
        }
        session.state = TurnState::Idle;

        if failed {
            SubmitOutcome::Failed(resolved)
        } else {
            SubmitOutcome::Replied(resolved)
        }
    }

    fn begin_turn(&self, text: &str) -> Result<(MessageId, ChatRequest), Rejection> {
        if text.trim().is_empty() {
            return Err(Rejection::EmptyInput);
        }

        let mut session = lock(&self.session);
        if session.state != TurnState::Idle {
            return Err(Rejection::Busy);
        }

        let placeholder = Message::pending();
        let pending = placeholder.id();
        session.conversation.append(Message::user(text));
        session.conversation.append(placeholder);
        session.state = TurnState::AwaitingReply { pending };

        Ok((
            pending,
            ChatRequest {
                session_id: self.session_id,
                chat_input: text.to_string(),
            },
        ))
    }
}

impl<T> TurnController<T> {
    /// Start a new chat: only a fresh welcome message remains.
    ///
    /// An in-flight request is not cancelled; its reply is dropped when it
    /// lands and the controller stays `AwaitingReply` until then.
    pub fn reset(&self) {
        lock(&self.session).conversation.reset();
    }

    /// Snapshot of the conversation.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        lock(&self.session).conversation.messages().to_vec()
    }

    /// Number of messages currently shown.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.session).conversation.len()
    }

    /// Always `false`: the welcome message is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.session).conversation.is_empty()
    }

    /// Current turn state.
    #[must_use]
    pub fn state(&self) -> TurnState {
        lock(&self.session).state
    }

    /// Whether the input control should accept text.
    #[must_use]
    pub fn is_input_enabled(&self) -> bool {
        self.state() == TurnState::Idle
    }

    /// Session identifier sent with every turn.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }
}
