//! Outbound client directives.
//!
//! The read-only client only ever sends four line kinds: the capability
//! request, its anonymous nickname, the channel join, and keep-alive replies.

use std::fmt::{self, Display, Formatter};

/// Capabilities requested during the handshake.
pub const TMI_CAPABILITIES: [&str; 3] = [
    "twitch.tv/tags",
    "twitch.tv/commands",
    "twitch.tv/membership",
];

/// Server name TMI uses in keep-alive probes and expects back in replies.
pub const KEEPALIVE_SERVER: &str = "tmi.twitch.tv";

/// A single outbound line, rendered without a line terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `CAP REQ :<cap> <cap> ...`
    CapReq(Vec<String>),
    /// `NICK <nick>`
    Nick(String),
    /// `JOIN #<channel>`; the channel is stored without `#`.
    Join(String),
    /// `PONG :<server>`
    Pong(String),
}

impl Directive {
    /// Capability request for the standard TMI extensions.
    pub fn cap_req_tmi() -> Self {
        Directive::CapReq(TMI_CAPABILITIES.iter().map(|c| c.to_string()).collect())
    }

    /// Join directive for `channel`, lower-cased with any leading `#` removed.
    pub fn join(channel: &str) -> Self {
        Directive::Join(channel.trim_start_matches('#').to_lowercase())
    }

    /// The fixed keep-alive reply.
    pub fn keepalive_reply() -> Self {
        Directive::Pong(KEEPALIVE_SERVER.to_string())
    }

    /// Command token, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Directive::CapReq(_) => "CAP",
            Directive::Nick(_) => "NICK",
            Directive::Join(_) => "JOIN",
            Directive::Pong(_) => "PONG",
        }
    }
}

impl Display for Directive {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Directive::CapReq(caps) => write!(f, "CAP REQ :{}", caps.join(" ")),
            Directive::Nick(nick) => write!(f, "NICK {}", nick),
            Directive::Join(channel) => write!(f, "JOIN #{}", channel),
            Directive::Pong(server) => write!(f, "PONG :{}", server),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_req_renders_all_extensions() {
        assert_eq!(
            Directive::cap_req_tmi().to_string(),
            "CAP REQ :twitch.tv/tags twitch.tv/commands twitch.tv/membership"
        );
    }

    #[test]
    fn test_join_lowercases_and_strips_hash() {
        assert_eq!(Directive::join("SeaIlo").to_string(), "JOIN #seailo");
        assert_eq!(Directive::join("#SeaIlo").to_string(), "JOIN #seailo");
    }

    #[test]
    fn test_keepalive_reply_is_fixed() {
        assert_eq!(Directive::keepalive_reply().to_string(), "PONG :tmi.twitch.tv");
    }

    #[test]
    fn test_nick() {
        let nick = Directive::Nick("justinfan42".into());
        assert_eq!(nick.to_string(), "NICK justinfan42");
        assert_eq!(nick.name(), "NICK");
    }
}
