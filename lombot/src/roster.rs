use std::collections::HashSet;

/// Prefix characters a server may put in front of a nickname in a names
/// reply to show channel privileges.
const PRIVILEGE_PREFIXES: &[char] = &['~', '&', '@', '%', '+'];

/// The set of nicknames currently believed to be present in the channel.
#[derive(Debug,Default,Clone)]
pub struct Roster
{
    members: HashSet<String>,
}

impl Roster
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn insert(&mut self, nick: &str)
    {
        if !nick.is_empty()
        {
            self.members.insert(nick.to_string());
        }
    }

    /// Remove a nickname. Returns whether it was present.
    pub fn remove(&mut self, nick: &str) -> bool
    {
        self.members.remove(nick)
    }

    /// Add every entry of a names reply, stripped of privilege prefixes.
    pub fn merge_names<'a>(&mut self, entries: impl IntoIterator<Item = &'a str>)
    {
        for entry in entries
        {
            self.insert(entry.trim_start_matches(PRIVILEGE_PREFIXES));
        }
    }

    pub fn contains(&self, nick: &str) -> bool
    {
        self.members.contains(nick)
    }

    pub fn len(&self) -> usize
    {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str>
    {
        self.members.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn merge_strips_prefixes()
    {
        let mut roster = Roster::new();
        roster.merge_names(["@op", "+voiced", "plain", "~&owner", ""]);

        assert_eq!(roster.len(), 4);
        for nick in ["op", "voiced", "plain", "owner"]
        {
            assert!(roster.contains(nick), "{} missing", nick);
        }
    }

    #[test]
    fn insert_is_idempotent()
    {
        let mut roster = Roster::new();
        roster.insert("a");
        roster.insert("a");
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn remove_absent()
    {
        let mut roster = Roster::new();
        roster.insert("a");

        assert!(!roster.remove("b"));
        assert_eq!(roster.len(), 1);
        assert!(roster.remove("a"));
        assert!(!roster.remove("a"));
        assert!(roster.is_empty());
    }
}
