use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Leading character of every public channel/group handle.
pub const HANDLE_MARKER: char = '@';

/// Opaque numeric user identity as issued by the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Public handle of a channel or group, stored exactly as submitted
/// (including the leading `@`).
///
/// Deserialization does not re-validate, so state files written by older
/// tools load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHandle(String);

impl ChatHandle {
    /// Parse user-supplied text as a handle: `@` followed by at least one
    /// `[A-Za-z0-9_]` character. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::Empty);
        }
        let Some(name) = input.strip_prefix(HANDLE_MARKER) else {
            return Err(Error::missing_marker(input));
        };
        if name.is_empty() {
            return Err(Error::MissingName);
        }
        if let Some(ch) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(Error::invalid_character(input, ch));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The handle with every leading marker stripped.
    pub fn name(&self) -> &str {
        self.0.trim_start_matches(HANDLE_MARKER)
    }

    /// Whether this handle designates the chat whose public username is
    /// `username`. Case-sensitive; leading markers on either side are ignored.
    pub fn matches_username(&self, username: &str) -> bool {
        self.name() == username.trim_start_matches(HANDLE_MARKER)
    }

    /// `https://t.me/<name>` join link for this handle.
    pub fn join_url(&self) -> String {
        format!("https://t.me/{}", self.name())
    }
}

impl fmt::Display for ChatHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChatHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("@news", "@news")]
    #[case("  @news_2024 ", "@news_2024")]
    #[case("@A", "@A")]
    fn parses_valid_handles(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(ChatHandle::parse(input).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("", Error::Empty)]
    #[case("   ", Error::Empty)]
    #[case("news", Error::missing_marker("news"))]
    #[case("@", Error::MissingName)]
    #[case("@my channel", Error::invalid_character("@my channel", ' '))]
    #[case("@@news", Error::invalid_character("@@news", '@'))]
    fn rejects_invalid_handles(#[case] input: &str, #[case] expected: Error) {
        assert_eq!(ChatHandle::parse(input), Err(expected));
    }

    #[test]
    fn username_match_ignores_marker_but_not_case() {
        let handle = ChatHandle::parse("@src").unwrap();
        assert!(handle.matches_username("src"));
        assert!(handle.matches_username("@src"));
        assert!(!handle.matches_username("SRC"));
        assert!(!handle.matches_username("other"));
    }

    #[test]
    fn legacy_handles_deserialize_without_validation() {
        let handle: ChatHandle = serde_json::from_str("\"src\"").unwrap();
        assert!(handle.matches_username("src"));
        assert_eq!(handle.join_url(), "https://t.me/src");
    }

    #[test]
    fn user_id_serializes_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(UserId(42), true);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"42":true}"#);
        let back: std::collections::BTreeMap<UserId, bool> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&UserId(42)), Some(&true));
    }
}
