//! The per-line command pipeline.
//!
//! - [`parser`]: raw line to [`ChatEvent`]
//! - [`command`]: [`ChatEvent`] to [`Command`]
//! - [`auth`]: sender privileges against an [`AuthContext`]
//! - [`dispatch`]: [`Command`] to one [`CommandSink`] callback
//!
//! Every stage is synchronous and side-effect free apart from the final
//! callback.

pub mod auth;
pub mod command;
pub mod dispatch;
pub mod parser;

pub use auth::{AuthContext, is_authorized};
pub use command::{Command, DEFAULT_COMMAND_PREFIX, extract};
pub use dispatch::{Callbacks, CommandSink, dispatch};
pub use parser::{ANONYMOUS_USERNAME, ChatEvent, parse};

/// What happened to one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// Not a chat message.
    NotChat,
    /// A chat message that is not a command.
    NoCommand,
    /// A command from a sender without privileges.
    Denied(Command),
    /// A command that reached the sink.
    Dispatched(Command),
}

/// Parser, extractor, authorizer and dispatcher bound to one configuration.
#[derive(Clone, Debug)]
pub struct Pipeline {
    auth: AuthContext,
    prefix: String,
}

impl Pipeline {
    pub fn new(auth: AuthContext, prefix: impl Into<String>) -> Self {
        Self {
            auth,
            prefix: prefix.into(),
        }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Run one raw line through every stage.
    pub fn handle<S: CommandSink + ?Sized>(&self, raw: &str, sink: &mut S) -> LineOutcome {
        let Some(event) = parse(raw, self.auth.owner()) else {
            return LineOutcome::NotChat;
        };
        let Some(command) = extract(&event, &self.prefix) else {
            return LineOutcome::NoCommand;
        };

        let authorized = is_authorized(&event.username, event.is_owner, event.is_moderator, &self.auth);
        if dispatch(&command, authorized, sink) {
            LineOutcome::Dispatched(command)
        } else {
            LineOutcome::Denied(command)
        }
    }
}
