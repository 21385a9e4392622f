//! Tracing setup and span constructors.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span for one connection manager, covering every reconnect.
    pub fn session(channel: &str, endpoint: &str) -> Span {
        info_span!("session", channel = %channel, endpoint = %endpoint)
    }

    /// Span for one connection attempt.
    pub fn attempt(number: u64) -> Span {
        info_span!("attempt", n = number)
    }
}
