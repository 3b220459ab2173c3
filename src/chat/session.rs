//! Chat Session Management
//!
//! Conversation log state machine and the session that delivers delayed,
//! cancellable assistant replies.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::models::chat::ChatMessage;
use crate::models::error::{HmpiError, Result};

use super::events::ChatEvent;
use super::responder::{Responder, DEFAULT_GREETING};

/// Default delay before the assistant reply is appended
pub const DEFAULT_RESPONSE_DELAY_MS: u64 = 1000;

/// Capacity of the event channel handed to the presentation layer
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// What to do with a new message while a reply is still pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendPolicy {
    /// Refuse the new message with [`HmpiError::Busy`]
    Reject,
    /// Cancel the pending reply and answer the new message instead
    Supersede,
}

impl Default for SendPolicy {
    fn default() -> Self {
        Self::Reject
    }
}

/// State of the conversation log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConversationState {
    Idle,
    AwaitingResponse { request_id: u64 },
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Result of accepting a user message
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub request_id: u64,
    pub message: ChatMessage,
    /// Request whose reply was dropped to make room for this one
    pub superseded: Option<u64>,
}

/// Append-only message log with an Idle / AwaitingResponse state machine.
///
/// Every send gets a new request id; a reply is only appended while its
/// request is still the pending one.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
    state: ConversationState,
    last_request_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the log with an assistant greeting (skipped when blank)
    pub fn with_greeting(greeting: &str) -> Self {
        let mut log = Self::new();
        if !greeting.trim().is_empty() {
            log.messages.push(ChatMessage::assistant(greeting));
        }
        log
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn pending_request(&self) -> Option<u64> {
        match self.state {
            ConversationState::Idle => None,
            ConversationState::AwaitingResponse { request_id } => Some(request_id),
        }
    }

    /// Append a user message and wait for its reply
    pub fn send(&mut self, content: &str, policy: SendPolicy) -> Result<SendReceipt> {
        if content.trim().is_empty() {
            return Err(HmpiError::EmptyInput);
        }

        let superseded = match (self.pending_request(), policy) {
            (None, _) => None,
            (Some(_), SendPolicy::Reject) => return Err(HmpiError::Busy),
            (Some(request_id), SendPolicy::Supersede) => Some(request_id),
        };

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        let message = ChatMessage::user(content);
        self.messages.push(message.clone());
        self.state = ConversationState::AwaitingResponse { request_id };

        Ok(SendReceipt {
            request_id,
            message,
            superseded,
        })
    }

    /// Append the reply for `request_id` if it is still the pending request
    pub fn complete(&mut self, request_id: u64, reply: impl Into<String>) -> Result<ChatMessage> {
        if self.pending_request() != Some(request_id) {
            return Err(HmpiError::StaleResponse { request_id });
        }

        let message = ChatMessage::assistant(reply);
        self.messages.push(message.clone());
        self.state = ConversationState::Idle;
        Ok(message)
    }

    /// Drop the pending request without a reply
    pub fn cancel(&mut self, request_id: u64) -> bool {
        if self.pending_request() == Some(request_id) {
            self.state = ConversationState::Idle;
            true
        } else {
            false
        }
    }
}

/// Options for a chat session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Assistant message the log starts with
    pub greeting: Option<String>,
    /// Simulated thinking time before the reply is appended
    pub response_delay: Duration,
    pub send_policy: SendPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            greeting: Some(DEFAULT_GREETING.to_string()),
            response_delay: Duration::from_millis(DEFAULT_RESPONSE_DELAY_MS),
            send_policy: SendPolicy::default(),
        }
    }
}

/// Reply task currently allowed to complete
struct PendingReply {
    request_id: u64,
    cancel_token: CancellationToken,
}

struct SessionState {
    log: ConversationLog,
    pending: Option<PendingReply>,
    closed: bool,
}

/// A chat conversation whose replies arrive after a delay on a tokio task.
///
/// Replies can be cancelled; a cancelled or superseded reply never reaches
/// the log.
pub struct ChatSession {
    id: String,
    state: Arc<Mutex<SessionState>>,
    responder: Arc<dyn Responder>,
    options: SessionOptions,
    event_tx: mpsc::Sender<ChatEvent>,
}

impl ChatSession {
    /// Create a session and the receiver for its events
    pub fn new(
        responder: Arc<dyn Responder>,
        options: SessionOptions,
    ) -> (Self, mpsc::Receiver<ChatEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let log = match options.greeting.as_deref() {
            Some(greeting) => ConversationLog::with_greeting(greeting),
            None => ConversationLog::new(),
        };

        let session = Self {
            id: Uuid::new_v4().to_string(),
            state: Arc::new(Mutex::new(SessionState {
                log,
                pending: None,
                closed: false,
            })),
            responder,
            options,
            event_tx,
        };

        tracing::info!("Started chat session {}", session.id);
        (session, event_rx)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Snapshot of the conversation log
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().log.messages().to_vec()
    }

    pub fn state(&self) -> ConversationState {
        self.state.lock().log.state()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Append a user message and schedule the assistant reply.
    ///
    /// The reply task is spawned before this returns; there is no suspension
    /// point between entering AwaitingResponse and spawning it.
    pub async fn send(&self, content: &str) -> Result<SendReceipt> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(HmpiError::SessionClosed);
        }

        let receipt = match state.log.send(content, self.options.send_policy) {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!("Chat session {} refused message: {}", self.id, e);
                return Err(e);
            }
        };

        if receipt.superseded.is_some() {
            if let Some(pending) = state.pending.take() {
                pending.cancel_token.cancel();
                tracing::info!(
                    "Request {} superseded by {} in session {}",
                    pending.request_id,
                    receipt.request_id,
                    self.id
                );
                self.emit(ChatEvent::ResponseCancelled {
                    session_id: self.id.clone(),
                    request_id: pending.request_id,
                });
            }
        }

        self.emit(ChatEvent::MessageAppended {
            session_id: self.id.clone(),
            message: receipt.message.clone(),
        });
        self.emit(ChatEvent::ResponsePending {
            session_id: self.id.clone(),
            request_id: receipt.request_id,
        });

        let cancel_token = CancellationToken::new();
        state.pending = Some(PendingReply {
            request_id: receipt.request_id,
            cancel_token: cancel_token.clone(),
        });
        self.spawn_reply(receipt.request_id, content.to_string(), cancel_token);

        Ok(receipt)
    }

    /// Cancel the pending reply, if any. Returns true when one was cancelled.
    pub async fn cancel_pending(&self) -> bool {
        let mut state = self.state.lock();
        match state.pending.take() {
            Some(pending) => {
                pending.cancel_token.cancel();
                state.log.cancel(pending.request_id);
                tracing::info!("Cancelled request {} in session {}", pending.request_id, self.id);
                self.emit(ChatEvent::ResponseCancelled {
                    session_id: self.id.clone(),
                    request_id: pending.request_id,
                });
                true
            }
            None => false,
        }
    }

    /// Close the session; the pending reply is dropped and further sends fail
    pub async fn close(&self) {
        self.state.lock().closed = true;
        self.cancel_pending().await;
        tracing::info!("Closed chat session {}", self.id);
    }

    fn spawn_reply(&self, request_id: u64, content: String, cancel_token: CancellationToken) {
        let state = Arc::clone(&self.state);
        let responder = Arc::clone(&self.responder);
        let event_tx = self.event_tx.clone();
        let session_id = self.id.clone();
        let delay = self.options.response_delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    tracing::debug!("Reply for request {} cancelled during delay", request_id);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let reply = responder.reply(&content).await;

            let mut state = state.lock();
            if cancel_token.is_cancelled() {
                tracing::warn!("Dropping reply for cancelled request {}", request_id);
                return;
            }
            match state.log.complete(request_id, reply) {
                Ok(message) => {
                    state.pending = None;
                    emit_event(&event_tx, ChatEvent::MessageAppended { session_id, message });
                }
                Err(e) => {
                    tracing::warn!("Dropping reply for request {}: {}", request_id, e);
                }
            }
        });
    }

    fn emit(&self, event: ChatEvent) {
        emit_event(&self.event_tx, event);
    }
}

/// Non-blocking send; callers hold the session lock so events keep log order
fn emit_event(event_tx: &mpsc::Sender<ChatEvent>, event: ChatEvent) {
    match event_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!(
                "Chat event channel full, dropping event for session {}",
                event.session_id()
            );
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!("No listener for chat events");
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        // Stop the reply task from outliving the session
        if let Some(pending) = self.state.lock().pending.take() {
            pending.cancel_token.cancel();
        }
    }
}
