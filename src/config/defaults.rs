//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use slirc_tmi::DEFAULT_ENDPOINT;

use crate::pipeline::DEFAULT_COMMAND_PREFIX;

// =============================================================================
// Chat Defaults
// =============================================================================

pub fn default_command_prefix() -> String {
    DEFAULT_COMMAND_PREFIX.to_string()
}

pub fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

pub fn default_reconnect_delay_secs() -> u64 {
    5
}

// =============================================================================
// Board Defaults
// =============================================================================

pub fn default_max_tasks() -> usize {
    50
}

pub fn default_notification_secs() -> u64 {
    3
}
