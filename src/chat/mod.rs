//! Client side of the chat: conversation state and the turn cycle.
//!
//! - [`Conversation`]: ordered messages, starting with the welcome message
//! - [`TurnController`]: one request in flight at a time, optimistic user append
//! - [`ChatTransport`]: seam to the proxy, [`HttpTransport`] for real use

pub mod controller;
pub mod conversation;
pub mod ids;
pub mod message;
pub mod reply;
pub mod transport;

pub use controller::{Rejection, SubmitOutcome, TurnController, TurnState};
pub use conversation::{Conversation, WELCOME_MESSAGE};
pub use ids::{MessageId, SessionId};
pub use message::{Message, Sender};
pub use reply::extract_reply;
pub use transport::{ChatRequest, ChatTransport, HttpTransport, TransportError};
