//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, ChatConfig, BoardConfig)
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks that report every problem at once

mod defaults;
mod types;
pub mod validation;

pub use types::{BoardConfig, ChatConfig, Config, ConfigError};
pub use validation::{ValidationError, validate};
