//! Operator username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside the allowed set.
    #[error("username contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input starts with a dot.
    #[error("username cannot start with '.'")]
    LeadingDot,
}

/// An operator username.
///
/// Usernames own order histories and name the per-user files on disk
/// (`order_history_{username}.json`, `{username}_{timestamp}.csv`), so the
/// accepted alphabet is deliberately narrow.
///
/// ## Constraints
///
/// - Length: 1-64 characters
/// - ASCII letters, digits, `_`, `-` and `.`
/// - Must not start with `.`
///
/// ## Examples
///
/// ```
/// use commande_core::Username;
///
/// assert!(Username::parse("alice").is_ok());
/// assert!(Username::parse("depot.nord-2").is_ok());
///
/// assert!(Username::parse("").is_err());
/// assert!(Username::parse("../etc").is_err());
/// assert!(Username::parse("a b").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 64 characters
    /// - Contains characters other than ASCII alphanumerics, `_`, `-`, `.`
    /// - Starts with `.`
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(UsernameError::InvalidCharacter(c));
        }

        if s.starts_with('.') {
            return Err(UsernameError::LeadingDot);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_usernames() {
        assert!(Username::parse("alice").is_ok());
        assert!(Username::parse("Bob_42").is_ok());
        assert!(Username::parse("depot.nord-2").is_ok());
        assert!(Username::parse("a").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Username::parse(""), Err(UsernameError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(65);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { max: 64 })
        ));
        assert!(Username::parse(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn test_parse_rejects_path_separators() {
        assert_eq!(
            Username::parse("../root"),
            Err(UsernameError::InvalidCharacter('/'))
        );
        assert_eq!(
            Username::parse("a\\b"),
            Err(UsernameError::InvalidCharacter('\\'))
        );
    }

    #[test]
    fn test_parse_rejects_whitespace_and_unicode() {
        assert!(Username::parse("a b").is_err());
        assert!(Username::parse("rené").is_err());
    }

    #[test]
    fn test_parse_leading_dot() {
        assert_eq!(Username::parse(".hidden"), Err(UsernameError::LeadingDot));
    }

    #[test]
    fn test_serde_roundtrip() {
        let username = Username::parse("alice").unwrap();
        let json = serde_json::to_string(&username).unwrap();
        assert_eq!(json, "\"alice\"");

        let parsed: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, username);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<Username, _> = serde_json::from_str("\"../x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_from_str() {
        let username: Username = "alice".parse().unwrap();
        assert_eq!(format!("{username}"), "alice");
        assert_eq!(username.as_str(), "alice");
    }
}
