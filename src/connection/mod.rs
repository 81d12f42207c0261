// src/connection/mod.rs

//! The transport-facing side of the WebSocket layer: the tracker the
//! transport adapter calls on connect/disconnect, and the error payload sent
//! to rejected clients.

// Declare the private sub-modules of the `connection` module.
mod tracker;
mod ws_error;

// Publicly re-export the primary types from the sub-modules.
pub use tracker::ConnectionTracker;
pub use ws_error::WebSocketError;
