//! Line transports.
//!
//! [`LineStream`] is the seam between the connection logic and the wire:
//! [`Transport`] implements it over TCP or WebSocket, and tests implement it
//! over in-memory channels.

mod endpoint;
mod error;
mod framed;

pub use self::endpoint::{Endpoint, DEFAULT_ENDPOINT};
pub use self::error::TransportError;
pub use self::framed::Transport;

/// A bidirectional stream of text lines, terminators stripped.
#[async_trait::async_trait]
pub trait LineStream: Send {
    /// Read the next line. `Ok(None)` means the peer closed the stream.
    async fn read_line(&mut self) -> Result<Option<String>, TransportError>;

    /// Write one line. The terminator is added by the transport.
    async fn write_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Close the stream. Idempotent; errors are swallowed.
    async fn close(&mut self);

    /// Whether lines can still be written.
    fn is_open(&self) -> bool;
}
