// src/core/registry.rs

//! The connection registry: shared, concurrently-updated knowledge of which
//! sessions are bound to which destination paths, and under which principal.
//!
//! The registry is the single authority for new-vs-existing classification.
//! [`ConnectionRegistry::bind`] classifies and records under one `DashMap`
//! entry lock, so two concurrent connects on the same (session, path) key can
//! never both observe `New`.

use crate::core::errors::ExamSockError;
use crate::core::events::Principal;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The outcome of classifying a (session, path) pair against current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The session has no record of this path.
    New,
    /// The session is already bound to this path.
    Existing,
}

/// The paths one session currently holds, each with the principal last seen
/// binding it.
#[derive(Debug, Default)]
struct SessionBindings {
    paths: HashMap<String, Arc<dyn Principal>>,
}

/// `ConnectionRegistry` maps session ids to their bound-path sets.
///
/// `DashMap` gives per-shard locking; every classify+record sequence for one
/// key runs inside a single entry operation, which is the mutual-exclusion
/// discipline callers rely on. Listeners and the tracker share one registry
/// behind an `Arc`.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: DashMap<String, SessionBindings>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `New` if the session has no record of this path, `Existing`
    /// otherwise. Read-only; callers that go on to record the binding use
    /// [`bind`](Self::bind) instead, which classifies atomically.
    pub fn classify(&self, session_id: &str, path: &str) -> Classification {
        match self.sessions.get(session_id) {
            Some(entry) if entry.paths.contains_key(path) => Classification::Existing,
            _ => Classification::New,
        }
    }

    /// Atomically classifies and records a binding.
    ///
    /// A `max_paths` of `0` means unlimited; otherwise a session attempting
    /// to bind a new path beyond the limit is rejected and the registry is
    /// left unchanged. Rebinding an already-held path always succeeds and
    /// refreshes the stored principal.
    pub fn bind(
        &self,
        session_id: &str,
        path: &str,
        principal: Arc<dyn Principal>,
        max_paths: usize,
    ) -> Result<Classification, ExamSockError> {
        match self.sessions.entry(session_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let bindings = occupied.get_mut();
                if let Some(held) = bindings.paths.get_mut(path) {
                    *held = principal;
                    return Ok(Classification::Existing);
                }
                if max_paths > 0 && bindings.paths.len() >= max_paths {
                    return Err(ExamSockError::SessionLimitExceeded {
                        session_id: session_id.to_string(),
                        max: max_paths,
                    });
                }
                bindings.paths.insert(path.to_string(), principal);
                Ok(Classification::New)
            }
            Entry::Vacant(vacant) => {
                let mut bindings = SessionBindings::default();
                bindings.paths.insert(path.to_string(), principal);
                vacant.insert(bindings);
                Ok(Classification::New)
            }
        }
    }

    /// Idempotently adds a path to the session's bound-path set.
    pub fn record_bind(&self, session_id: &str, path: &str, principal: Arc<dyn Principal>) {
        // Unlimited bind cannot fail.
        let _ = self.bind(session_id, path, principal, 0);
    }

    /// Removes a binding, returning the principal that held it.
    ///
    /// When the session's bound-path set becomes empty the session entry is
    /// removed entirely. An unknown binding is a no-op, not an error:
    /// disconnects may race with registry cleanup.
    pub fn record_unbind(&self, session_id: &str, path: &str) -> Option<Arc<dyn Principal>> {
        if let Entry::Occupied(mut occupied) = self.sessions.entry(session_id.to_string()) {
            let removed = occupied.get_mut().paths.remove(path);
            if occupied.get().paths.is_empty() {
                occupied.remove();
                debug!("Removed session '{session_id}' with no remaining bound paths.");
            }
            removed
        } else {
            None
        }
    }

    /// Returns the principal last associated with the binding, if any.
    pub fn principal_of(&self, session_id: &str, path: &str) -> Option<Arc<dyn Principal>> {
        self.sessions
            .get(session_id)
            .and_then(|entry| entry.paths.get(path).cloned())
    }

    /// Returns the paths a session is currently bound to.
    pub fn paths_of(&self, session_id: &str) -> Vec<String> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.paths.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the number of sessions with at least one bound path.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Returns the total number of (session, path) bindings.
    pub fn binding_count(&self) -> usize {
        self.sessions.iter().map(|e| e.paths.len()).sum()
    }
}
