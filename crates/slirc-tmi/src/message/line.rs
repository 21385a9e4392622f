//! Zero-copy borrowed line type.
//!
//! ```
//! use slirc_tmi::LineRef;
//!
//! let raw = "@display-name=Alice;mod=1 :alice!alice@alice.tmi.twitch.tv PRIVMSG #seailo :!todo add buy milk";
//! let line = LineRef::parse(raw).unwrap();
//!
//! assert_eq!(line.command(), "PRIVMSG");
//! assert_eq!(line.tags().and_then(|t| t.raw_value("mod")), Some("1"));
//! assert_eq!(line.source_nick(), Some("alice"));
//! assert_eq!(line.trailing(), Some("!todo add buy milk"));
//! ```

use smallvec::SmallVec;

use crate::error::LineParseError;

use super::prefix::PrefixRef;
use super::scan::ScannedLine;
use super::tags::TagBlock;

/// A scanned protocol line borrowing from its input.
#[derive(Clone, Debug, PartialEq)]
pub struct LineRef<'a> {
    tags: Option<TagBlock<'a>>,
    prefix: Option<PrefixRef<'a>>,
    command: &'a str,
    params: SmallVec<[&'a str; 15]>,
    has_trailing: bool,
}

impl<'a> LineRef<'a> {
    /// Scan a raw line. Trailing CR/LF are ignored.
    pub fn parse(raw: &'a str) -> Result<Self, LineParseError> {
        let trimmed = raw.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            return Err(LineParseError::EmptyLine);
        }

        let scanned = ScannedLine::scan(trimmed)
            .map_err(|position| LineParseError::InvalidCommand { position })?;

        Ok(LineRef {
            tags: scanned.tags.map(TagBlock::new),
            prefix: scanned.prefix.map(PrefixRef::parse),
            command: scanned.command,
            params: scanned.params,
            has_trailing: scanned.has_trailing,
        })
    }

    /// Tag block, if the line carried one.
    #[inline]
    pub fn tags(&self) -> Option<TagBlock<'a>> {
        self.tags
    }

    /// Source prefix, if any.
    #[inline]
    pub fn prefix(&self) -> Option<PrefixRef<'a>> {
        self.prefix
    }

    /// Nickname of the sending user, when the prefix is a user mask.
    pub fn source_nick(&self) -> Option<&'a str> {
        self.prefix.and_then(|p| p.nick())
    }

    /// Command token as sent (numerics stay numeric).
    #[inline]
    pub fn command(&self) -> &'a str {
        self.command
    }

    /// Whether the command token equals `name`, ignoring ASCII case.
    #[inline]
    pub fn is_command(&self, name: &str) -> bool {
        self.command.eq_ignore_ascii_case(name)
    }

    /// All parameters, trailing included.
    #[inline]
    pub fn params(&self) -> &[&'a str] {
        &self.params
    }

    /// Parameter at `index`.
    #[inline]
    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).copied()
    }

    /// The `:`-introduced trailing parameter, if the line had one.
    pub fn trailing(&self) -> Option<&'a str> {
        if self.has_trailing {
            self.params.last().copied()
        } else {
            None
        }
    }
}
