//! Message source prefix.
//!
//! TMI sends `:tmi.twitch.tv` for server lines and `:nick!user@host` for chat
//! lines. Only the latter identifies a chatter.

/// Borrowed message prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixRef<'a> {
    /// Server name (e.g. `tmi.twitch.tv`).
    Server(&'a str),
    /// User mask: nick, user, host.
    User {
        /// Login nickname.
        nick: &'a str,
        /// Ident.
        user: &'a str,
        /// Host.
        host: &'a str,
    },
}

impl<'a> PrefixRef<'a> {
    /// Split a raw prefix (without the leading `:`).
    ///
    /// A prefix is a user mask only when it has the full `nick!user@host`
    /// shape with a non-empty nick. Anything else is treated as a server name.
    pub fn parse(raw: &'a str) -> Self {
        if let Some((nick, rest)) = raw.split_once('!') {
            if let Some((user, host)) = rest.split_once('@') {
                if !nick.is_empty() {
                    return PrefixRef::User { nick, user, host };
                }
            }
        }
        PrefixRef::Server(raw)
    }

    /// The nickname, if this is a user prefix.
    pub fn nick(&self) -> Option<&'a str> {
        match self {
            PrefixRef::User { nick, .. } => Some(nick),
            PrefixRef::Server(_) => None,
        }
    }

    /// Whether this prefix names a user.
    pub fn is_user(&self) -> bool {
        matches!(self, PrefixRef::User { .. })
    }
}
