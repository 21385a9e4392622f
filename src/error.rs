//! Error types for the chat link.
//!
//! None of these reach command consumers; they exist for logging and for the
//! control surface of the connection manager.

use slirc_tmi::TransportError;
use thiserror::Error;

/// Errors raised by one chat link session.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("connect failed: {0}")]
    Connect(#[source] TransportError),

    #[error("handshake aborted: transport not open")]
    NotReady,

    #[error("handshake failed sending {directive}: {source}")]
    Handshake {
        directive: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("keep-alive reply failed: {0}")]
    Keepalive(#[source] TransportError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The manager task has exited.
    #[error("connection manager is not running")]
    ManagerGone,
}

impl LinkError {
    /// Get a static error code string for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect_failed",
            Self::NotReady => "not_ready",
            Self::Handshake { .. } => "handshake_failed",
            Self::Keepalive(_) => "keepalive_failed",
            Self::Transport(_) => "transport_error",
            Self::ManagerGone => "manager_gone",
        }
    }
}
