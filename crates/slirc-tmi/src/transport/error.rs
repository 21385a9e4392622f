//! Transport error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::error::ProtocolError;

/// Errors raised while connecting, reading or writing a line transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The endpoint string could not be understood.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// TCP connect failed.
    #[error("connect to {endpoint} failed: {source}")]
    Connect {
        /// Endpoint that was dialed.
        endpoint: String,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred on an established stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line violated framing rules.
    #[error("transport protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// WebSocket handshake or framing failure.
    #[error("websocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    /// The transport was already closed.
    #[error("transport is closed")]
    Closed,
}

impl From<tungstenite::Error> for TransportError {
    fn from(e: tungstenite::Error) -> Self {
        TransportError::WebSocket(Box::new(e))
    }
}

impl TransportError {
    /// Static label for log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint(_) => "invalid_endpoint",
            Self::Connect { .. } => "connect",
            Self::Io(_) => "io",
            Self::Protocol(_) => "protocol",
            Self::WebSocket(_) => "websocket",
            Self::Closed => "closed",
        }
    }
}
