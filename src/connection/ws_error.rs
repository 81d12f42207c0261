// src/connection/ws_error.rs

//! The structured error payload sent to a client over the WebSocket before
//! the connection is closed.

use crate::core::errors::ExamSockError;
use serde::{Deserialize, Serialize};

/// A client-facing WebSocket error frame body.
///
/// Serialized directly to the rejected client with camelCase field names;
/// never persisted. Terminal for the connection: the transport sends it and
/// closes, with no retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketError {
    pub status_code: u16,
    pub error_code: String,
    pub message: Option<String>,
}

impl WebSocketError {
    pub fn new(status_code: u16, error_code: impl Into<String>, message: Option<String>) -> Self {
        Self {
            status_code,
            error_code: error_code.into(),
            message,
        }
    }

    /// Builds the payload for a rejected unauthenticated connection:
    /// status 401, code "UNAUTHORIZED", and an optional human-readable detail.
    pub fn unauthorized(message: Option<String>) -> Self {
        Self::new(401, "UNAUTHORIZED", message)
    }

    /// Serializes the payload for the wire.
    pub fn to_json(&self) -> Result<String, ExamSockError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<&ExamSockError> for WebSocketError {
    fn from(err: &ExamSockError) -> Self {
        match err {
            ExamSockError::MissingPrincipal(_) => Self::unauthorized(Some(err.to_string())),
            other => Self::new(500, "INTERNAL", Some(other.to_string())),
        }
    }
}
