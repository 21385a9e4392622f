//! How the manager obtains a transport.

use async_trait::async_trait;
use slirc_tmi::{Endpoint, LineStream, Transport, TransportError};

/// Opens line streams. The manager holds one and calls it per attempt.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn LineStream>, TransportError>;
}

/// Connects over the real network with [`Transport`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TmiConnector;

#[async_trait]
impl Connector for TmiConnector {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn LineStream>, TransportError> {
        let transport = Transport::connect(endpoint).await?;
        Ok(Box::new(transport))
    }
}
