//! Chat line parser.
//!
//! Turns one raw TMI line into a [`ChatEvent`] when, and only when, it has the
//! full chat shape:
//!
//! ```text
//! @k=v;k=v :nick!user@host PRIVMSG #channel :message text
//! ```
//!
//! Anything else (server numerics, membership lines, keep-alives, partial
//! matches) yields `None`.

use slirc_tmi::LineRef;

/// Username reported when the `display-name` tag is missing or empty.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

/// One chat message with the sender metadata the pipeline needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatEvent {
    /// The sender's display name.
    pub username: String,
    /// The message text, untrimmed.
    pub body: String,
    /// Twitch's moderator flag (`mod=1`).
    pub is_moderator: bool,
    /// Whether the sender is the configured owner.
    pub is_owner: bool,
}

/// Parse a raw line. `owner` is compared to the display name ignoring case.
pub fn parse(raw: &str, owner: &str) -> Option<ChatEvent> {
    let line = LineRef::parse(raw).ok()?;

    let tags = line.tags()?;
    if !line.prefix()?.is_user() || line.command() != "PRIVMSG" {
        return None;
    }

    let params = line.params();
    if params.len() != 2 || !is_channel_token(params[0]) {
        return None;
    }
    let body = line.trailing()?;

    let username = tags
        .non_empty("display-name")
        .map(|name| name.into_owned())
        .unwrap_or_else(|| ANONYMOUS_USERNAME.to_string());
    let is_moderator = tags.raw_value("mod") == Some("1");
    let is_owner = eq_ignore_case(&username, owner);

    Some(ChatEvent {
        username,
        body: body.to_string(),
        is_moderator,
        is_owner,
    })
}

/// `#` followed by one or more word characters.
fn is_channel_token(token: &str) -> bool {
    match token.strip_prefix('#') {
        Some(name) => !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        None => false,
    }
}

/// Case-insensitive name comparison.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        a.eq_ignore_ascii_case(b)
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{DEFAULT_COMMAND_PREFIX, extract};
    use proptest::prelude::*;

    const ALICE_ADD: &str =
        "@display-name=Alice;mod=1 :alice!alice@alice.tmi.twitch.tv PRIVMSG #seailo :!todo add buy milk";

    #[test]
    fn test_parse_full_line() {
        let event = parse(ALICE_ADD, "seailo").unwrap();
        assert_eq!(event.username, "Alice");
        assert_eq!(event.body, "!todo add buy milk");
        assert!(event.is_moderator);
        assert!(!event.is_owner);
    }

    #[test]
    fn test_owner_match_ignores_case() {
        let raw = "@display-name=SeaIlo;mod=0 :seailo!seailo@seailo.tmi.twitch.tv PRIVMSG #seailo :hi";
        let event = parse(raw, "seailo").unwrap();
        assert!(event.is_owner);
        assert!(!event.is_moderator);
    }

    #[test]
    fn test_missing_display_name_is_anonymous() {
        let raw = "@mod=0 :bob!bob@bob.tmi.twitch.tv PRIVMSG #seailo :hello";
        assert_eq!(parse(raw, "seailo").unwrap().username, ANONYMOUS_USERNAME);

        let raw = "@display-name=;mod=0 :bob!bob@bob.tmi.twitch.tv PRIVMSG #seailo :hello";
        assert_eq!(parse(raw, "seailo").unwrap().username, ANONYMOUS_USERNAME);
    }

    #[test]
    fn test_mod_flag_must_be_exactly_one() {
        for flag in ["0", "", "11", "true"] {
            let raw = format!("@display-name=Bob;mod={} :bob!bob@h PRIVMSG #c :x", flag);
            assert!(!parse(&raw, "c").unwrap().is_moderator, "mod={}", flag);
        }
        let raw = "@display-name=Bob :bob!bob@h PRIVMSG #c :x";
        assert!(!parse(raw, "c").unwrap().is_moderator);
    }

    #[test]
    fn test_partial_shapes_are_dropped() {
        let rejects = [
            // no tag block
            ":alice!alice@host PRIVMSG #seailo :!todo add milk",
            // server prefix
            "@mod=1 :tmi.twitch.tv PRIVMSG #seailo :!todo add milk",
            // other command
            "@mod=1 :alice!alice@host NOTICE #seailo :!todo add milk",
            "@mod=1 :alice!alice@host USERNOTICE #seailo :!todo add milk",
            // malformed channel
            "@mod=1 :alice!alice@host PRIVMSG seailo :!todo add milk",
            "@mod=1 :alice!alice@host PRIVMSG # :!todo add milk",
            "@mod=1 :alice!alice@host PRIVMSG #sea-ilo :!todo add milk",
            // no body
            "@mod=1 :alice!alice@host PRIVMSG #seailo",
            "PING :tmi.twitch.tv",
            ":tmi.twitch.tv 001 justinfan1 :Welcome, GLHF!",
            "",
        ];
        for raw in rejects {
            assert_eq!(parse(raw, "seailo"), None, "{:?}", raw);
        }
    }

    #[test]
    fn test_body_containing_ping_is_chat() {
        let raw = "@display-name=Bob :bob!bob@h PRIVMSG #seailo :PING :tmi.twitch.tv";
        assert_eq!(parse(raw, "seailo").unwrap().body, "PING :tmi.twitch.tv");
    }

    #[test]
    fn test_body_keeps_spacing() {
        let raw = "@display-name=Bob :bob!bob@h PRIVMSG #seailo :!todo  add   spaced  ";
        assert_eq!(parse(raw, "seailo").unwrap().body, "!todo  add   spaced  ");
    }

    #[test]
    fn test_unicode_owner_comparison() {
        assert!(eq_ignore_case("ÉLODIE", "élodie"));
        assert!(!eq_ignore_case("alice", "alicia"));
    }

    proptest! {
        #[test]
        fn parse_and_extract_accept_any_input(raw in any::<String>(), owner in any::<String>()) {
            if let Some(event) = parse(&raw, &owner) {
                let _ = extract(&event, DEFAULT_COMMAND_PREFIX);
            }
        }

        #[test]
        fn parse_and_extract_accept_any_chat_body(tags in "[^ ]{0,40}", body in ".{0,80}") {
            let raw = format!("@{} :bob!bob@bob.tmi.twitch.tv PRIVMSG #seailo :!todo {}", tags, body);
            if let Some(event) = parse(&raw, "seailo") {
                let _ = extract(&event, DEFAULT_COMMAND_PREFIX);
            }
        }
    }
}
