//! Network layer - the long-lived chat link.
//!
//! - [`ConnectionManager`]: the task that owns the transport and drives the
//!   pipeline
//! - [`ReconnectTimer`]: single-slot reconnection delay
//! - [`Connector`]: how a transport is opened, so tests can script one

mod connector;
mod manager;
mod reconnect;

pub use connector::{Connector, TmiConnector};
pub use manager::{ConnectionManager, ConnectionState, SessionConfig};
pub use reconnect::{RECONNECT_DELAY, ReconnectTimer};
