use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum HmpiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Empty input")]
    EmptyInput,

    #[error("A response is already pending")]
    Busy,

    #[error("Stale response for request {request_id}")]
    StaleResponse { request_id: u64 },

    #[error("Chat session is closed")]
    SessionClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HmpiError {
    /// Check if this error can be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, HmpiError::Busy)
    }

    /// Get a suggestion for recovering from this error
    pub fn recovery_suggestion(&self) -> &str {
        match self {
            HmpiError::InvalidInput(_) => "Check the measured value, limit and location",
            HmpiError::EmptyInput => "Provide at least one reading or a non-empty message",
            HmpiError::Busy => "Wait for the assistant to reply before sending again",
            HmpiError::StaleResponse { .. } => "The reply was superseded by a newer message",
            HmpiError::SessionClosed => "Open a new chat session",
            HmpiError::Config(_) => "Review the configuration file or remove it to use defaults",
        }
    }
}

pub type Result<T> = std::result::Result<T, HmpiError>;
