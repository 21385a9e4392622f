//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use slirc_tmi::{Endpoint, TransportError};

use super::defaults::{
    default_command_prefix, default_endpoint, default_max_tasks, default_notification_secs,
    default_reconnect_delay_secs,
};
use crate::network::SessionConfig;
use crate::pipeline::AuthContext;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Chat connection and command settings.
    pub chat: ChatConfig,
    /// Reference task board settings.
    #[serde(default)]
    pub board: BoardConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Chat connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Channel to join, without `#` (e.g., "seailo").
    pub channel: String,
    /// Owner display name. Defaults to the channel name.
    #[serde(default)]
    pub owner: Option<String>,
    /// Extra users allowed to issue commands.
    #[serde(default)]
    pub moderators: Vec<String>,
    /// Chat prefix that introduces a command (default: "!todo").
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// `wss://`, `ws://` or `tcp://host:port` (default: the public TMI WebSocket).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Seconds to wait before reconnecting after a drop (default: 5).
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

impl ChatConfig {
    /// The configured owner, or the channel name.
    pub fn owner(&self) -> &str {
        self.owner.as_deref().unwrap_or(&self.channel)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn endpoint(&self) -> Result<Endpoint, TransportError> {
        self.endpoint.parse()
    }

    /// Build the connection manager configuration.
    pub fn session(&self) -> Result<SessionConfig, TransportError> {
        Ok(SessionConfig::new(&self.channel)
            .with_auth(AuthContext::new(self.owner(), &self.moderators))
            .with_command_prefix(&self.command_prefix)
            .with_endpoint(self.endpoint()?)
            .with_reconnect_delay(self.reconnect_delay()))
    }
}

/// Reference task board configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Maximum number of tasks (default: 50).
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,
    /// Seconds a notification stays visible (default: 3).
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_tasks: default_max_tasks(),
            notification_secs: default_notification_secs(),
        }
    }
}
