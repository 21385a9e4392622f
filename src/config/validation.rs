//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("chat.channel is required")]
    MissingChannel,
    #[error("chat.channel must be a bare name without '#' or whitespace, got '{0}'")]
    InvalidChannel(String),
    #[error("chat.command_prefix is required")]
    MissingCommandPrefix,
    #[error("chat.command_prefix must not contain whitespace, got '{0}'")]
    InvalidCommandPrefix(String),
    #[error("chat.endpoint must be ws://, wss:// or tcp://host:port, got '{0}'")]
    InvalidEndpoint(String),
    #[error("chat.reconnect_delay_secs must be greater than zero")]
    ZeroReconnectDelay,
    #[error("board.max_tasks must be greater than zero")]
    ZeroMaxTasks,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let chat = &config.chat;

    if chat.channel.is_empty() {
        errors.push(ValidationError::MissingChannel);
    } else if chat.channel.contains('#') || chat.channel.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidChannel(chat.channel.clone()));
    }

    if chat.command_prefix.is_empty() {
        errors.push(ValidationError::MissingCommandPrefix);
    } else if chat.command_prefix.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidCommandPrefix(chat.command_prefix.clone()));
    }

    if chat.endpoint().is_err() {
        errors.push(ValidationError::InvalidEndpoint(chat.endpoint.clone()));
    }

    if chat.reconnect_delay_secs == 0 {
        errors.push(ValidationError::ZeroReconnectDelay);
    }

    if config.board.max_tasks == 0 {
        errors.push(ValidationError::ZeroMaxTasks);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
