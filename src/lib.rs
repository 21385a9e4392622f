//! slirc-todo - a `!todo` task list driven by Twitch chat.
//!
//! A [`network::ConnectionManager`] keeps an anonymous, read-only TMI
//! connection alive and runs every chat line through the
//! [`pipeline`]: parse, extract a command, authorize the sender, and dispatch
//! to a [`pipeline::CommandSink`] such as the in-memory [`board::Board`].

pub mod board;
pub mod config;
pub mod error;
pub mod network;
pub mod pipeline;
pub mod telemetry;

pub use error::LinkError;
