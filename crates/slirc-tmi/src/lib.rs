//! # slirc-tmi
//!
//! Wire layer for the Twitch Messaging Interface (TMI), Twitch's dialect of
//! IRC with IRCv3 message tags.
//!
//! ## Features
//!
//! - Zero-copy line scanning with tags, prefix, command and parameters
//! - IRCv3 tag block lookup with escape handling
//! - The anonymous `justinfan` handshake and keep-alive reply
//! - Optional Tokio integration: a CRLF line codec and TCP / WebSocket transports

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ```rust
//! use slirc_tmi::LineRef;
//!
//! let raw = "@display-name=Alice;mod=1 :alice!alice@alice.tmi.twitch.tv PRIVMSG #seailo :!todo add milk";
//! let line = LineRef::parse(raw).expect("valid line");
//!
//! assert!(line.is_command("PRIVMSG"));
//! assert_eq!(line.tags().and_then(|t| t.raw_value("mod")), Some("1"));
//! assert_eq!(line.trailing(), Some("!todo add milk"));
//! ```

#[cfg(feature = "tokio")]
pub mod codec;
pub mod directive;
pub mod error;
pub mod handshake;
pub mod message;
#[cfg(feature = "tokio")]
pub mod transport;

#[cfg(feature = "tokio")]
pub use self::codec::{LineCodec, MAX_LINE_LEN};
pub use self::directive::{Directive, KEEPALIVE_SERVER, TMI_CAPABILITIES};
pub use self::error::{LineParseError, ProtocolError};
pub use self::handshake::{anonymous_nick, Handshake, ANONYMOUS_NICK_PREFIX};
pub use self::message::{LineRef, PrefixRef, TagBlock};
#[cfg(feature = "tokio")]
pub use self::transport::{Endpoint, LineStream, Transport, TransportError, DEFAULT_ENDPOINT};
