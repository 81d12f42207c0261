// src/connection/tracker.rs

//! The inbound facade the transport layer calls when it observes a connect,
//! subscribe, or disconnect on a session.
//!
//! The tracker owns the wiring between registry classification and event
//! publication: it decides which event variant a transition produces, records
//! the binding, and hands the event to the dispatcher.

use crate::config::Config;
use crate::core::dispatch::EventDispatcher;
use crate::core::errors::ExamSockError;
use crate::core::events::{ConnectionEvent, EventSource, Principal};
use crate::core::registry::{Classification, ConnectionRegistry};
use std::sync::Arc;
use tracing::{error, warn};

/// `ConnectionTracker` turns raw transport transitions into classified,
/// published [`ConnectionEvent`]s.
///
/// It may be called concurrently from any worker context; the registry owns
/// the per-key locking, so the tracker itself holds no state beyond its
/// collaborators.
pub struct ConnectionTracker {
    registry: Arc<ConnectionRegistry>,
    dispatcher: Arc<EventDispatcher>,
    source: EventSource,
    max_paths_per_session: usize,
}

impl ConnectionTracker {
    /// Creates a tracker with default settings (unlimited paths per session).
    pub fn new(registry: Arc<ConnectionRegistry>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            registry,
            dispatcher,
            source: EventSource::new("examsock"),
            max_paths_per_session: 0,
        }
    }

    /// Creates a tracker configured from the application [`Config`].
    pub fn from_config(
        registry: Arc<ConnectionRegistry>,
        dispatcher: Arc<EventDispatcher>,
        config: &Config,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            source: EventSource::new(config.event_source.as_str()),
            max_paths_per_session: config.max_paths_per_session,
        }
    }

    /// Handles an observed connect or subscribe on `(session_id, path)`.
    ///
    /// A missing principal is terminal: the caller converts the returned
    /// error into the unauthorized payload, sends it, and closes. Otherwise
    /// the binding is classified and recorded atomically and exactly one of
    /// `NewUserPathConnection` / `ExistingUserPathConnection` is published.
    ///
    /// With a fail-fast dispatcher a `ListenerFailure` error can surface
    /// after the binding was recorded; the binding survives, and a later
    /// reconnect on the same pair classifies as `Existing`.
    pub fn on_connect(
        &self,
        session_id: &str,
        path: &str,
        principal: Option<Arc<dyn Principal>>,
    ) -> Result<ConnectionEvent, ExamSockError> {
        let Some(principal) = principal else {
            warn!(session_id, path, "Rejecting connection without a principal.");
            return Err(ExamSockError::MissingPrincipal(session_id.to_string()));
        };

        let classification = self.registry.bind(
            session_id,
            path,
            Arc::clone(&principal),
            self.max_paths_per_session,
        )?;

        let event = match classification {
            Classification::New => {
                ConnectionEvent::new_user(self.source.clone(), principal, session_id, path)
            }
            Classification::Existing => {
                ConnectionEvent::existing_user(self.source.clone(), principal, session_id, path)
            }
        };

        self.dispatcher.publish(&event)?;
        Ok(event)
    }

    /// Handles an observed disconnect or unsubscribe on `(session_id, path)`.
    ///
    /// Publishes exactly one `UserPathConnectionClosed` for a bound pair and
    /// removes the binding. An unknown binding is a silent no-op: disconnects
    /// may race with registry cleanup.
    pub fn on_disconnect(&self, session_id: &str, path: &str) -> Option<ConnectionEvent> {
        let principal = self.registry.record_unbind(session_id, path)?;
        let event = ConnectionEvent::closed(self.source.clone(), principal, session_id, path);

        // The binding is already gone; a fail-fast dispatcher error cannot
        // undo the disconnect, so it is logged rather than propagated.
        if let Err(e) = self.dispatcher.publish(&event) {
            error!(session_id, path, "Dispatch failed for closed-connection event: {e}");
        }
        Some(event)
    }
}
