//! Anonymous client handshake.
//!
//! TMI lets unauthenticated clients read chat under a `justinfan<N>` nick.
//! The handshake is three directives sent in a fixed order and never
//! individually retried:
//!
//! ```text
//! CAP REQ :twitch.tv/tags twitch.tv/commands twitch.tv/membership
//! NICK justinfan<N>
//! JOIN #<channel>
//! ```

use rand::Rng;

use crate::directive::Directive;

/// Nickname prefix TMI reserves for anonymous read-only clients.
pub const ANONYMOUS_NICK_PREFIX: &str = "justinfan";

/// Exclusive upper bound of the random anonymous suffix.
pub const ANONYMOUS_SUFFIX_BOUND: u32 = 100_000;

/// Generate a fresh anonymous nickname with a suffix in `0..100000`.
pub fn anonymous_nick<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}{}",
        ANONYMOUS_NICK_PREFIX,
        rng.gen_range(0..ANONYMOUS_SUFFIX_BOUND)
    )
}

/// The handshake for one connection attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handshake {
    nick: String,
    channel: String,
}

impl Handshake {
    /// Build a handshake with a freshly randomized anonymous identity.
    pub fn anonymous(channel: &str) -> Self {
        Self::with_nick(channel, anonymous_nick(&mut rand::thread_rng()))
    }

    /// Build a handshake with a caller-chosen nickname.
    pub fn with_nick(channel: &str, nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            channel: channel.trim_start_matches('#').to_lowercase(),
        }
    }

    /// Nickname this handshake registers.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Lower-cased channel name, without `#`.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The directives to send, in order.
    pub fn directives(&self) -> [Directive; 3] {
        [
            Directive::cap_req_tmi(),
            Directive::Nick(self.nick.clone()),
            Directive::join(&self.channel),
        ]
    }
}
