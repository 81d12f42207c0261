// src/core/dispatch.rs

//! The event dispatcher: delivers connection events to registered listeners
//! synchronously, in registration order, on the publisher's context.

use crate::config::Config;
use crate::core::errors::ExamSockError;
use crate::core::events::ConnectionEvent;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error};

/// A subscriber to connection lifecycle events.
///
/// `on_event` may be invoked concurrently for events from different sessions;
/// implementations guard their own shared state. Dispatch itself holds no
/// locks while listeners run.
pub trait ConnectionListener: Send + Sync {
    fn on_event(&self, event: &ConnectionEvent) -> Result<(), ExamSockError>;
}

/// `EventDispatcher` delivers each published event to every registered
/// listener, in the order they subscribed.
///
/// By default a failing listener is logged and isolated: the remaining
/// listeners still run and the publisher never sees the failure. The
/// fail-fast alternative aborts delivery at the first failure and returns it
/// to the publisher.
pub struct EventDispatcher {
    /// Registration-ordered listener list. Treated as a set keyed by `Arc`
    /// identity, so double-subscribe is a no-op.
    listeners: RwLock<Vec<Arc<dyn ConnectionListener>>>,
    fail_fast: bool,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDispatcher {
    /// Creates a dispatcher with failure isolation (the default mode).
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            fail_fast: false,
        }
    }

    /// Creates a dispatcher that aborts delivery on the first listener failure.
    pub fn fail_fast() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            fail_fast: true,
        }
    }

    /// Creates a dispatcher in the mode the application [`Config`] selects.
    pub fn from_config(config: &Config) -> Self {
        if config.fail_fast_dispatch {
            Self::fail_fast()
        } else {
            Self::new()
        }
    }

    /// Registers a listener. Subscribing the same `Arc` twice has no
    /// additional effect.
    pub fn subscribe(&self, listener: Arc<dyn ConnectionListener>) {
        let mut listeners = self.listeners.write();
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            debug!("Listener already subscribed; ignoring duplicate subscription.");
            return;
        }
        listeners.push(listener);
    }

    /// Deregisters a listener. Unsubscribing an unknown listener is a no-op.
    pub fn unsubscribe(&self, listener: &Arc<dyn ConnectionListener>) {
        self.listeners.write().retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Returns the number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Publishes an event to all current listeners, synchronously on the
    /// caller's context.
    ///
    /// Returns the number of listeners that handled the event successfully.
    /// In the default mode listener failures are logged and skipped; in
    /// fail-fast mode the first failure is returned and the remaining
    /// listeners are not invoked.
    pub fn publish(&self, event: &ConnectionEvent) -> Result<usize, ExamSockError> {
        // Snapshot under the read lock so listeners can (un)subscribe others
        // from within their callback without deadlocking.
        let snapshot: Vec<Arc<dyn ConnectionListener>> = self.listeners.read().clone();

        let mut delivered = 0;
        for listener in &snapshot {
            match listener.on_event(event) {
                Ok(()) => delivered += 1,
                Err(e) if self.fail_fast => {
                    return Err(ExamSockError::ListenerFailure(e.to_string()));
                }
                Err(e) => {
                    error!(
                        session_id = %event.session_id,
                        path = %event.path,
                        "Listener failed while handling {:?}: {e}",
                        event.kind
                    );
                }
            }
        }
        Ok(delivered)
    }
}
