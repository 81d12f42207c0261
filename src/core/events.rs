// src/core/events.rs

//! Defines the connection lifecycle events published by the WebSocket layer.
//!
//! The event set is closed: a session either binds a destination path for the
//! first time, rebinds a path it already holds, or releases a binding on
//! disconnect. A single struct with a kind tag replaces a class hierarchy;
//! listeners match on [`ConnectionEventKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An authenticated identity associated with a connection.
///
/// Only a stable identity string is required, which keeps the core decoupled
/// from whichever authentication framework the host application uses.
pub trait Principal: Send + Sync + fmt::Debug {
    /// A stable, unique name for this identity.
    fn name(&self) -> &str;
}

impl Principal for String {
    fn name(&self) -> &str {
        self
    }
}

/// An opaque reference to the component that produced an event.
///
/// Carried on every event but never interpreted by this crate; it exists so
/// listeners can tell transport adapters apart when several feed one
/// dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSource(Arc<str>);

impl EventSource {
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

/// Discriminates the three observable connection transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionEventKind {
    /// The session's first observed bind to this path.
    NewUserPathConnection,
    /// The session rebound a path it was already bound to.
    ExistingUserPathConnection,
    /// A bound session disconnected or unsubscribed from the path.
    UserPathConnectionClosed,
}

/// An immutable record of one connection transition.
///
/// Exactly one event is produced per observed transition; the
/// (`session_id`, `path`) pair identifies the binding the event concerns.
#[derive(Debug, Clone)]
pub struct ConnectionEvent {
    /// The component that observed the transition. Not semantically used here.
    pub source: EventSource,
    /// The transport session the binding belongs to.
    pub session_id: String,
    /// The destination path (simp path) the session bound or released.
    pub path: String,
    /// The authenticated identity behind the session.
    pub principal: Arc<dyn Principal>,
    pub kind: ConnectionEventKind,
}

impl ConnectionEvent {
    /// Builds the event for a session's first bind to a path.
    pub fn new_user(
        source: EventSource,
        principal: Arc<dyn Principal>,
        session_id: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            source,
            session_id: session_id.into(),
            path: path.into(),
            principal,
            kind: ConnectionEventKind::NewUserPathConnection,
        }
    }

    /// Builds the event for a rebind of an already-held path.
    pub fn existing_user(
        source: EventSource,
        principal: Arc<dyn Principal>,
        session_id: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            source,
            session_id: session_id.into(),
            path: path.into(),
            principal,
            kind: ConnectionEventKind::ExistingUserPathConnection,
        }
    }

    /// Builds the event for a released binding.
    pub fn closed(
        source: EventSource,
        principal: Arc<dyn Principal>,
        session_id: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            source,
            session_id: session_id.into(),
            path: path.into(),
            principal,
            kind: ConnectionEventKind::UserPathConnectionClosed,
        }
    }
}
