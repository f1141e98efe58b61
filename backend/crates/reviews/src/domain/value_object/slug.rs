//! Slug Value Object
//!
//! URL-safe address of a category or genre: letters, digits, hyphen and
//! underscore, at most 50 characters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum slug length (in characters)
pub const SLUG_MAX_LENGTH: usize = 50;

/// Error returned when slug validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    Empty,
    TooLong { length: usize, max: usize },
    InvalidCharacter { char: char, position: usize },
}

impl fmt::Display for SlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Slug cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "Slug is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter { char, position } => {
                write!(
                    f,
                    "Invalid character '{char}' at position {position}. Only letters, digits, - and _ are allowed"
                )
            }
        }
    }
}

impl std::error::Error for SlugError {}

/// Validated slug
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn new(input: impl AsRef<str>) -> Result<Self, SlugError> {
        let slug = input.as_ref().trim().to_string();

        if slug.is_empty() {
            return Err(SlugError::Empty);
        }

        let length = slug.chars().count();
        if length > SLUG_MAX_LENGTH {
            return Err(SlugError::TooLong {
                length,
                max: SLUG_MAX_LENGTH,
            });
        }

        for (pos, ch) in slug.chars().enumerate() {
            if !(ch.is_ascii_alphanumeric() || ch == '-' || ch == '_') {
                return Err(SlugError::InvalidCharacter {
                    char: ch,
                    position: pos,
                });
            }
        }

        Ok(Self(slug))
    }

    /// Create from a database value (assumed already validated)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slug").field(&self.0).finish()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        assert!(Slug::new("fiction").is_ok());
        assert!(Slug::new("sci-fi").is_ok());
        assert!(Slug::new("top_10").is_ok());
        assert!(Slug::new("Drama").is_ok());
    }

    #[test]
    fn test_invalid_slugs() {
        assert!(matches!(Slug::new(""), Err(SlugError::Empty)));
        assert!(matches!(
            Slug::new("sci fi"),
            Err(SlugError::InvalidCharacter { char: ' ', .. })
        ));
        assert!(matches!(
            Slug::new("café"),
            Err(SlugError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn test_max_length() {
        assert!(Slug::new("a".repeat(SLUG_MAX_LENGTH)).is_ok());
        assert!(matches!(
            Slug::new("a".repeat(SLUG_MAX_LENGTH + 1)),
            Err(SlugError::TooLong { .. })
        ));
    }
}
