//! Genre Entity
//!
//! A title carries any number of genres.

use crate::domain::value_object::slug::Slug;

/// Genre entity; the id is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub slug: Slug,
}
