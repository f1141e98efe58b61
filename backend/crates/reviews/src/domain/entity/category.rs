//! Category Entity
//!
//! A title belongs to at most one category (film, book, music, ...).

use crate::domain::value_object::slug::Slug;

/// Category entity; the id is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: Slug,
}
