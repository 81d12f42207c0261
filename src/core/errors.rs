// src/core/errors.rs

//! Defines the primary error type for the entire crate.

use thiserror::Error;

/// The main error enum, representing all possible failures within the
/// WebSocket layer core. Using `thiserror` allows for clean error definitions
/// and automatic `From` trait implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExamSockError {
    /// A connection or subscription arrived without an authenticated principal.
    /// Terminal for the connection; the transport serializes the unauthorized
    /// payload and closes.
    #[error("NOAUTH missing principal for session '{0}'")]
    MissingPrincipal(String),

    /// A subscribed listener failed while handling an event.
    #[error("Listener failure: {0}")]
    ListenerFailure(String),

    /// A session attempted to bind more paths than the configured maximum.
    #[error("Session '{session_id}' exceeds the maximum of {max} bound paths")]
    SessionLimitExceeded { session_id: String, max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// --- From trait implementations for easy error conversion ---

impl From<serde_json::Error> for ExamSockError {
    fn from(e: serde_json::Error) -> Self {
        ExamSockError::Internal(format!("JSON serialization/deserialization error: {e}"))
    }
}
