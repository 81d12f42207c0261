// src/core/mod.rs

//! The core of the WebSocket layer: event model, dispatcher, and the
//! connection registry that decides new-vs-existing classification.

pub mod dispatch;
pub mod errors;
pub mod events;
pub mod registry;

// Re-export the primary types for convenient access from the crate root.
pub use dispatch::{ConnectionListener, EventDispatcher};
pub use errors::ExamSockError;
pub use events::{ConnectionEvent, ConnectionEventKind, EventSource, Principal};
pub use registry::{Classification, ConnectionRegistry};
