//! Chat Assistant Module
//!
//! Rule-based water quality assistant:
//! - Ordered keyword rules with first-match-wins replies
//! - Conversation log with an Idle / AwaitingResponse state machine
//! - Delayed replies on cancellable tasks, guarded by request ids

pub mod events;
pub mod responder;
pub mod session;

pub use events::ChatEvent;
pub use responder::{
    respond, KeywordResponder, Responder, DEFAULT_FALLBACK, DEFAULT_GREETING, DEFAULT_RULES,
};
pub use session::{
    ChatSession, ConversationLog, ConversationState, SendPolicy, SendReceipt, SessionOptions,
    DEFAULT_RESPONSE_DELAY_MS,
};
