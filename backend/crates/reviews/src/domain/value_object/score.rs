//! Score Value Object
//!
//! A review's rating of a title: an integer in [1, 10].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest allowed score
pub const SCORE_MIN: i16 = 1;

/// Highest allowed score
pub const SCORE_MAX: i16 = 10;

/// Error returned when a score is out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutOfRange {
    pub value: i16,
}

impl fmt::Display for ScoreOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score must be between {SCORE_MIN} and {SCORE_MAX}, got {}",
            self.value
        )
    }
}

impl std::error::Error for ScoreOutOfRange {}

/// Validated review score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Score(i16);

impl Score {
    /// Create a score, rejecting values outside [1, 10]
    pub const fn new(value: i16) -> Result<Self, ScoreOutOfRange> {
        if value < SCORE_MIN || value > SCORE_MAX {
            return Err(ScoreOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Create from a database value (the column carries a CHECK)
    pub const fn from_db(value: i16) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(&self) -> i16 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i16> for Score {
    type Error = ScoreOutOfRange;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i16 {
    fn from(score: Score) -> Self {
        score.0
    }
}
