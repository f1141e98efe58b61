//! Review Entity
//!
//! An authored opinion on a title with an integer score. At most one
//! review per (title, author) pair; the store constraint enforces it.

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};

use crate::domain::value_object::score::Score;

/// Review read model
///
/// `author_username` and `title_name` are joined in by the store for
/// the API representation; ownership checks use `author_id` only.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i64,
    pub title_id: i64,
    pub title_name: String,
    pub author_id: UserId,
    pub author_username: String,
    pub text: String,
    pub score: Score,
    /// Set once at creation, immutable afterwards
    pub pub_date: DateTime<Utc>,
}
