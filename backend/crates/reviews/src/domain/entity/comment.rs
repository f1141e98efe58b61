//! Comment Entity
//!
//! A remark on a review; same ownership shape as a review, one nesting
//! level deeper (title -> review -> comment).

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};

/// Comment read model
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub review_id: i64,
    /// Text of the commented review, joined in for the API representation
    pub review_text: String,
    pub author_id: UserId,
    pub author_username: String,
    pub text: String,
    /// Set once at creation, immutable afterwards
    pub pub_date: DateTime<Utc>,
}
