//! Username Value Object
//!
//! The username is the public handle identifying a principal. It is used
//! for token exchange, admin lookup and display.
//!
//! ## Invariants
//! - Non-empty after trimming
//! - At most 150 characters
//! - Letters, digits and `_ . @ + -` only
//! - Not a reserved word (`me` routes to the self-service endpoint and is
//!   rejected in any letter case)
//!
//! Input is trimmed and NFKC-normalized before validation; case is
//! preserved (usernames are case-sensitive apart from the reserved-word
//! check).

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for a username (in characters)
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Words that cannot be used as usernames.
///
/// `me` is the path segment of the self-service profile endpoint.
const RESERVED_WORDS: &[&str] = &["me"];

/// Allowed special characters in a username
const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '@', '+', '-'];

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when username validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// Username is empty after normalization
    Empty,

    /// Username is too long (maximum: USERNAME_MAX_LENGTH)
    TooLong { length: usize, max: usize },

    /// Username contains an invalid character
    InvalidCharacter { char: char, position: usize },

    /// Username is a reserved word
    Reserved { word: String },
}

impl fmt::Display for UsernameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Username cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "Username is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter { char, position } => {
                write!(
                    f,
                    "Invalid character '{char}' at position {position}. Only letters, digits and _ . @ + - are allowed"
                )
            }
            Self::Reserved { word } => {
                write!(f, "'{word}' is a reserved username")
            }
        }
    }
}

impl std::error::Error for UsernameError {}

// ============================================================================
// Username Value Object
// ============================================================================

/// Validated, normalized username
///
/// # Invariants
/// - Non-empty, at most [`USERNAME_MAX_LENGTH`] characters
/// - Contains only letters, digits and `_ . @ + -`
/// - Not a reserved word (checked case-insensitively)
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Create a new Username from raw input
    ///
    /// Applies normalization (trim, NFKC) and validates.
    pub fn new(input: impl AsRef<str>) -> Result<Self, UsernameError> {
        let normalized = Self::normalize(input.as_ref());
        Self::validate(&normalized)?;
        Ok(Self(normalized))
    }

    /// Get the username as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Create from a database value (assumed already validated)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Normalize input (NFKC, trim)
    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    /// Validate the normalized username
    fn validate(username: &str) -> Result<(), UsernameError> {
        if username.is_empty() {
            return Err(UsernameError::Empty);
        }

        let length = username.chars().count();
        if length > USERNAME_MAX_LENGTH {
            return Err(UsernameError::TooLong {
                length,
                max: USERNAME_MAX_LENGTH,
            });
        }

        for (pos, ch) in username.chars().enumerate() {
            if !Self::is_valid_char(ch) {
                return Err(UsernameError::InvalidCharacter {
                    char: ch,
                    position: pos,
                });
            }
        }

        // Reserved words are matched in any letter case
        let lowered = username.to_lowercase();
        if RESERVED_WORDS.iter().any(|&w| w == lowered) {
            return Err(UsernameError::Reserved {
                word: username.to_string(),
            });
        }

        Ok(())
    }

    /// Check if character is valid in a username
    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(&c)
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Username").field(&self.0).finish()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Username {
    type Error = UsernameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(name: Username) -> Self {
        name.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_trim_whitespace() {
            let name = Username::new("  alice  ").unwrap();
            assert_eq!(name.as_str(), "alice");
        }

        #[test]
        fn test_case_preserved() {
            let name = Username::new("AlIcE_123").unwrap();
            assert_eq!(name.as_str(), "AlIcE_123");
        }

        #[test]
        fn test_nfkc_normalization() {
            // Full-width 'Ａ' (U+FF21) normalizes to ASCII 'A'
            let name = Username::new("Ａlice").unwrap();
            assert_eq!(name.as_str(), "Alice");
        }
    }

    mod length_validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert!(matches!(Username::new(""), Err(UsernameError::Empty)));
        }

        #[test]
        fn test_whitespace_only_fails() {
            assert!(matches!(Username::new("   "), Err(UsernameError::Empty)));
        }

        #[test]
        fn test_maximum_length() {
            let input = "a".repeat(USERNAME_MAX_LENGTH);
            assert!(Username::new(&input).is_ok());
        }

        #[test]
        fn test_too_long() {
            let input = "a".repeat(USERNAME_MAX_LENGTH + 1);
            assert!(matches!(
                Username::new(&input),
                Err(UsernameError::TooLong { .. })
            ));
        }
    }

    mod character_validation {
        use super::*;

        #[test]
        fn test_valid_alphanumeric() {
            assert!(Username::new("alice123").is_ok());
        }

        #[test]
        fn test_valid_special_chars() {
            assert!(Username::new("alice_bob").is_ok());
            assert!(Username::new("alice.bob").is_ok());
            assert!(Username::new("alice@example").is_ok());
            assert!(Username::new("alice+tag").is_ok());
            assert!(Username::new("alice-bob").is_ok());
        }

        #[test]
        fn test_invalid_special_char() {
            assert!(matches!(
                Username::new("alice!bob"),
                Err(UsernameError::InvalidCharacter { char: '!', .. })
            ));
        }

        #[test]
        fn test_whitespace_in_middle_fails() {
            assert!(matches!(
                Username::new("alice bob"),
                Err(UsernameError::InvalidCharacter { char: ' ', .. })
            ));
        }
    }

    mod reserved_words {
        use super::*;

        #[test]
        fn test_reserved_me() {
            assert!(matches!(
                Username::new("me"),
                Err(UsernameError::Reserved { word }) if word == "me"
            ));
        }

        #[test]
        fn test_reserved_case_insensitive() {
            assert!(matches!(Username::new("Me"), Err(UsernameError::Reserved { .. })));
            assert!(matches!(Username::new("mE"), Err(UsernameError::Reserved { .. })));
            assert!(matches!(Username::new("ME"), Err(UsernameError::Reserved { .. })));
        }

        #[test]
        fn test_prefix_is_not_reserved() {
            assert!(Username::new("merlin").is_ok());
            assert!(Username::new("acme").is_ok());
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn test_serialize() {
            let name = Username::new("alice").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"alice\"");
        }

        #[test]
        fn test_deserialize_invalid() {
            let result: Result<Username, _> = serde_json::from_str("\"me\"");
            assert!(result.is_err());
        }
    }
}
