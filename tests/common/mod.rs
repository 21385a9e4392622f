//! Integration test common infrastructure.
//!
//! Provides a scripted in-memory connector, a fake TMI server on loopback,
//! and a sink that records every callback.

pub mod connector;
pub mod server;
pub mod sink;

#[allow(unused_imports)]
pub use connector::{Peer, PeerQueue, ScriptedConnector, Step};
#[allow(unused_imports)]
pub use server::{ServerConn, TestTmiServer};
#[allow(unused_imports)]
pub use sink::{CallLog, recording_sink};

/// A tagged chat line as TMI delivers it.
#[allow(dead_code)]
pub fn privmsg(display_name: &str, is_mod: bool, channel: &str, body: &str) -> String {
    let login = display_name.to_lowercase();
    format!(
        "@badges=;color=;display-name={};mod={};room-id=1;user-id=2 :{login}!{login}@{login}.tmi.twitch.tv PRIVMSG #{} :{}",
        display_name,
        if is_mod { 1 } else { 0 },
        channel,
        body,
    )
}
