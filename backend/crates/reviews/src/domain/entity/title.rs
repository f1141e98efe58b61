//! Title Entity
//!
//! A reviewable work. The rating is derived - the arithmetic mean of
//! all review scores, computed by the store at read time and never
//! persisted. A title without reviews has no rating.

use crate::domain::entity::{category::Category, genre::Genre};

/// Title read model; the id is assigned by the store
#[derive(Debug, Clone)]
pub struct Title {
    pub id: i64,
    pub name: String,
    /// Optional release year; never in the future
    pub year: Option<i16>,
    pub description: String,
    /// Mean of review scores at query time; `None` without reviews
    pub rating: Option<f64>,
    pub genres: Vec<Genre>,
    pub category: Option<Category>,
}

/// Field values for creating or replacing a title, with slugs already
/// resolved to catalog ids
#[derive(Debug, Clone)]
pub struct TitleDraft {
    pub name: String,
    pub year: Option<i16>,
    pub description: String,
    pub genre_ids: Vec<i64>,
    pub category_id: Option<i64>,
}
