//! Where to connect.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use super::error::TransportError;

/// The public TMI WebSocket endpoint.
pub const DEFAULT_ENDPOINT: &str = "wss://irc-ws.chat.twitch.tv:443";

/// A TMI server address.
///
/// Written as `ws://…` / `wss://…` for WebSocket or `tcp://host:port` for a
/// plain line-oriented socket.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Plain TCP.
    Tcp {
        /// Hostname or address.
        host: String,
        /// Port.
        port: u16,
    },
    /// WebSocket URL, `ws` or `wss`.
    WebSocket(String),
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::WebSocket(DEFAULT_ENDPOINT.to_string())
    }
}

impl Endpoint {
    /// Plain TCP endpoint.
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Endpoint::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Whether this endpoint speaks WebSocket.
    pub fn is_websocket(&self) -> bool {
        matches!(self, Endpoint::WebSocket(_))
    }
}

impl FromStr for Endpoint {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("ws://") || s.starts_with("wss://") {
            if s.len() <= "wss://".len() {
                return Err(TransportError::InvalidEndpoint(s.to_string()));
            }
            return Ok(Endpoint::WebSocket(s.to_string()));
        }

        let authority = s
            .strip_prefix("tcp://")
            .ok_or_else(|| TransportError::InvalidEndpoint(s.to_string()))?;
        let (host, port) = authority
            .rsplit_once(':')
            .ok_or_else(|| TransportError::InvalidEndpoint(s.to_string()))?;
        let port = port
            .parse::<u16>()
            .map_err(|_| TransportError::InvalidEndpoint(s.to_string()))?;
        if host.is_empty() {
            return Err(TransportError::InvalidEndpoint(s.to_string()));
        }

        Ok(Endpoint::tcp(host, port))
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp { host, port } => write!(f, "tcp://{}:{}", host, port),
            Endpoint::WebSocket(url) => f.write_str(url),
        }
    }
}
