//! Chat Event Types
//!
//! Events emitted to the presentation layer while a chat session runs.

use serde::Serialize;

use crate::models::chat::ChatMessage;

/// Events emitted from a chat session.
///
/// Events are sent while the session state is locked, so they arrive in the
/// same order as the log. A listener that falls more than the channel
/// capacity behind loses events; `ChatSession::messages` stays authoritative.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatEvent {
    /// A user or assistant message was appended to the log
    MessageAppended {
        session_id: String,
        message: ChatMessage,
    },

    /// A reply is being prepared for this request
    ResponsePending {
        session_id: String,
        request_id: u64,
    },

    /// The pending reply was cancelled or superseded and will not be appended
    ResponseCancelled {
        session_id: String,
        request_id: u64,
    },
}

impl ChatEvent {
    pub fn session_id(&self) -> &str {
        match self {
            ChatEvent::MessageAppended { session_id, .. }
            | ChatEvent::ResponsePending { session_id, .. }
            | ChatEvent::ResponseCancelled { session_id, .. } => session_id,
        }
    }
}
