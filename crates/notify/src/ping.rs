//! Free-text host names to member mentions.
//!
//! Host cells are typed by hand ("Al", "alice", "Alice P."), so matching is a
//! best-effort prefix search, not identity verification.

use crate::traits::Member;

/// Members of the host role, in platform order.
pub type Roster = Vec<Member>;

/// Builds the ping string appended to reminder lines.
pub struct PingBuilder {
    roster: Roster,
    mention: Box<dyn Fn(&Member) -> String + Send + Sync>,
}

impl PingBuilder {
    /// Builder using `<@id>` mention tokens.
    pub fn new(roster: Roster) -> Self {
        Self::with_mention(roster, |m| format!("<@{}>", m.id))
    }

    pub fn with_mention(
        roster: Roster,
        mention: impl Fn(&Member) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            roster,
            mention: Box::new(mention),
        }
    }

    pub fn roster(&self) -> &[Member] {
        &self.roster
    }

    /// First roster member whose display name starts with `name`, ignoring case.
    ///
    /// Linear scan in roster order: with an ambiguous prefix the earlier member
    /// wins, even if a later one matches exactly.
    pub fn resolve(&self, name: &str) -> Option<&Member> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.roster
            .iter()
            .find(|m| m.display_name.to_lowercase().starts_with(&needle))
    }

    /// Mention for a resolved name, `@name` otherwise.
    pub fn ping(&self, name: &str) -> String {
        match self.resolve(name) {
            Some(member) => (self.mention)(member),
            None => format!("@{}", name.trim()),
        }
    }

    /// One token per name, joined with single spaces. Repeated names ping twice.
    pub fn pings<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> String {
        names
            .into_iter()
            .map(|n| self.ping(n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Debug for PingBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PingBuilder")
            .field("roster", &self.roster)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        vec![
            Member::new("1", "Alice Park"),
            Member::new("2", "alfred"),
            Member::new("3", "Bob"),
        ]
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let pings = PingBuilder::new(roster());
        assert_eq!(pings.ping("bo"), "<@3>");
        assert_eq!(pings.ping("ALICE"), "<@1>");
    }

    #[test]
    fn ambiguous_prefix_takes_first_in_roster_order() {
        let pings = PingBuilder::new(roster());
        assert_eq!(pings.resolve("al").map(|m| m.id.as_str()), Some("1"));
    }

    #[test]
    fn unknown_name_falls_back_to_literal() {
        let pings = PingBuilder::new(roster());
        assert_eq!(pings.ping("Zed"), "@Zed");
        // Prefix only, never substring.
        assert_eq!(pings.ping("Park"), "@Park");
    }

    #[test]
    fn blank_name_never_resolves() {
        let pings = PingBuilder::new(roster());
        assert!(pings.resolve("  ").is_none());
    }

    #[test]
    fn pings_join_with_spaces_and_keep_duplicates() {
        let pings = PingBuilder::new(roster());
        assert_eq!(pings.pings(["Bob", "Zed", "bob"]), "<@3> @Zed <@3>");
        assert_eq!(pings.pings(Vec::<&str>::new()), "");
    }

    #[test]
    fn custom_mention_format() {
        let pings = PingBuilder::with_mention(roster(), |m| format!("[{}]", m.display_name));
        assert_eq!(pings.ping("b"), "[Bob]");
    }
}
