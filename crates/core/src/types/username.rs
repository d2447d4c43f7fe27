//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too short.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a disallowed character.
    #[error("username may only contain letters, digits, '.', '-' and '_'")]
    InvalidCharacter,
}

/// A login name chosen at registration.
///
/// ## Constraints
///
/// - Length: 3-32 characters
/// - Allowed characters: ASCII letters, digits, `.`, `-`, `_`
///
/// Usernames compare case-sensitively; uniqueness is enforced by the
/// database, not by this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum length of a username.
    pub const MIN_LENGTH: usize = 3;

    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, outside the length bounds,
    /// or contains a character outside the allowed set.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        {
            return Err(UsernameError::InvalidCharacter);
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
    fn test_parse_valid() {
        assert!(Username::parse("asha").is_ok());
        assert!(Username::parse("a.sha-99_x").is_ok());
        assert!(Username::parse("abc").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Username::parse(""), Err(UsernameError::Empty)));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(33);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            Username::parse("asha kumar"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("asha@shop"),
            Err(UsernameError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let name = Username::parse("asha").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"asha\"");
        let parsed: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, name);
    }
}
