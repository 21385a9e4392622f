//! Command extraction.
//!
//! A chat body is a command when it starts with the command prefix, then
//! whitespace, then a keyword:
//!
//! | keywords                           | command            | needs text |
//! |------------------------------------|--------------------|------------|
//! | `add`                              | `Add`              | yes        |
//! | `delete`, `del`, `remove`, `rm`    | `Delete`           | yes        |
//! | `done`, `complete`, `check`, `toggle` | `Toggle`        | yes        |
//! | `clear`, `reset`                   | `Clear`            | no         |
//! | `hide`, `show`, `toggle-widget`    | `ToggleVisibility` | no         |

use super::parser::ChatEvent;

/// Prefix used when none is configured.
pub const DEFAULT_COMMAND_PREFIX: &str = "!todo";

/// A recognized task-list command.
///
/// `token` is a 1-based ordinal or a free-text fragment; resolving it to a
/// task is left to the consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Append a task.
    Add { text: String, author: String },
    /// Remove a task.
    Delete { token: String, author: String },
    /// Flip a task's completed flag.
    Toggle { token: String, author: String },
    /// Remove every task.
    Clear { author: String },
    /// Show or hide the list.
    ToggleVisibility { author: String },
}

impl Command {
    /// Who issued the command.
    pub fn author(&self) -> &str {
        match self {
            Command::Add { author, .. }
            | Command::Delete { author, .. }
            | Command::Toggle { author, .. }
            | Command::Clear { author }
            | Command::ToggleVisibility { author } => author,
        }
    }

    /// Static name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Delete { .. } => "delete",
            Command::Toggle { .. } => "toggle",
            Command::Clear { .. } => "clear",
            Command::ToggleVisibility { .. } => "toggle_visibility",
        }
    }
}

/// Keyword classes, before the remainder is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Keyword {
    Add,
    Delete,
    Toggle,
    Clear,
    ToggleVisibility,
}

impl Keyword {
    fn lookup(token: &str) -> Option<Self> {
        const TABLE: &[(&str, Keyword)] = &[
            ("add", Keyword::Add),
            ("delete", Keyword::Delete),
            ("del", Keyword::Delete),
            ("remove", Keyword::Delete),
            ("rm", Keyword::Delete),
            ("done", Keyword::Toggle),
            ("complete", Keyword::Toggle),
            ("check", Keyword::Toggle),
            ("toggle", Keyword::Toggle),
            ("clear", Keyword::Clear),
            ("reset", Keyword::Clear),
            ("hide", Keyword::ToggleVisibility),
            ("show", Keyword::ToggleVisibility),
            ("toggle-widget", Keyword::ToggleVisibility),
        ];

        TABLE
            .iter()
            .find(|(word, _)| word.eq_ignore_ascii_case(token))
            .map(|(_, keyword)| *keyword)
    }
}

/// Extract a command from `event`'s body using `prefix`.
///
/// The prefix match is case-sensitive; keywords are not. The remainder is
/// trimmed at both ends and keeps its interior spacing.
pub fn extract(event: &ChatEvent, prefix: &str) -> Option<Command> {
    let rest = event.body.strip_prefix(prefix)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let rest = rest.trim();
    let (keyword, remainder) = match rest.split_once(char::is_whitespace) {
        Some((keyword, remainder)) => (keyword, remainder.trim()),
        None => (rest, ""),
    };

    let author = event.username.clone();
    let command = match Keyword::lookup(keyword)? {
        Keyword::Add if !remainder.is_empty() => Command::Add {
            text: remainder.to_string(),
            author,
        },
        Keyword::Delete if !remainder.is_empty() => Command::Delete {
            token: remainder.to_string(),
            author,
        },
        Keyword::Toggle if !remainder.is_empty() => Command::Toggle {
            token: remainder.to_string(),
            author,
        },
        Keyword::Clear => Command::Clear { author },
        Keyword::ToggleVisibility => Command::ToggleVisibility { author },
        _ => return None,
    };

    Some(command)
}
