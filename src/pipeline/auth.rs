//! Command authorization.

use std::collections::BTreeSet;

/// Who may issue commands besides Twitch moderators.
///
/// Moderator names are stored lower-cased, so membership ignores case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthContext {
    owner: String,
    moderators: BTreeSet<String>,
}

impl AuthContext {
    /// Context where the channel owner is the only named user.
    pub fn for_channel(channel: &str) -> Self {
        Self::new(channel.trim_start_matches('#'), std::iter::empty::<&str>())
    }

    /// Context with an explicit owner and moderator list.
    ///
    /// Names are trimmed; empty names and case-insensitive duplicates are dropped.
    pub fn new<I, S>(owner: &str, moderators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ctx = Self {
            owner: owner.trim().to_string(),
            moderators: BTreeSet::new(),
        };
        for name in moderators {
            ctx.add_moderator(name.as_ref());
        }
        ctx
    }

    /// The owner name used for the `is_owner` comparison.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Whether `name` is on the configured moderator list.
    pub fn is_listed(&self, name: &str) -> bool {
        self.moderators.contains(&normalize(name))
    }

    /// Add a moderator. Returns `false` for empty names and duplicates.
    pub fn add_moderator(&mut self, name: &str) -> bool {
        let name = normalize(name);
        if name.is_empty() {
            return false;
        }
        self.moderators.insert(name)
    }

    /// Remove a moderator. Returns whether the name was listed.
    pub fn remove_moderator(&mut self, name: &str) -> bool {
        self.moderators.remove(&normalize(name))
    }

    /// Listed moderators, lower-cased, in sorted order.
    pub fn moderators(&self) -> impl Iterator<Item = &str> {
        self.moderators.iter().map(String::as_str)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether `author` may issue commands.
///
/// True when any of: the owner flag, Twitch's moderator flag, or membership
/// in the configured moderator list.
pub fn is_authorized(author: &str, is_owner: bool, is_moderator: bool, ctx: &AuthContext) -> bool {
    is_owner || is_moderator || ctx.is_listed(author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flags_authorize() {
        let ctx = AuthContext::for_channel("seailo");
        assert!(is_authorized("anyone", true, false, &ctx));
        assert!(is_authorized("anyone", false, true, &ctx));
        assert!(!is_authorized("anyone", false, false, &ctx));
    }

    #[test]
    fn test_listed_moderator_ignores_case() {
        let ctx = AuthContext::new("seailo", ["Bob"]);
        assert!(is_authorized("bob", false, false, &ctx));
        assert!(is_authorized("BOB", false, false, &ctx));
        assert!(!is_authorized("bobby", false, false, &ctx));
    }

    #[test]
    fn test_moderator_list_editing() {
        let mut ctx = AuthContext::for_channel("#SeaIlo");
        assert_eq!(ctx.owner(), "SeaIlo");

        assert!(ctx.add_moderator("  Carol "));
        assert!(!ctx.add_moderator("carol"));
        assert!(!ctx.add_moderator("   "));
        assert!(ctx.add_moderator("alice"));
        assert_eq!(ctx.moderators().collect::<Vec<_>>(), vec!["alice", "carol"]);

        assert!(ctx.remove_moderator("CAROL"));
        assert!(!ctx.remove_moderator("carol"));
        assert!(!ctx.is_listed("carol"));
    }

    proptest! {
        #[test]
        fn adding_a_moderator_never_revokes(
            author in "[A-Za-z0-9_]{1,12}",
            is_owner in any::<bool>(),
            is_moderator in any::<bool>(),
            existing in prop::collection::vec("[A-Za-z0-9_]{1,12}", 0..6),
            added in "[A-Za-z0-9_]{1,12}",
        ) {
            let before = AuthContext::new("owner", &existing);
            let mut after = before.clone();
            after.add_moderator(&added);

            if is_authorized(&author, is_owner, is_moderator, &before) {
                prop_assert!(is_authorized(&author, is_owner, is_moderator, &after));
            }
        }
    }
}
