//! API DTOs (Data Transfer Objects)
//!
//! Reviews and comments reference related entities the way the API
//! always has: the author by username, a review's title by name, a
//! comment's review by its text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    category::Category, comment::Comment, genre::Genre, review::Review, title::Title,
};

// ============================================================================
// Categories / Genres
// ============================================================================

/// Category representation
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.as_str().to_string(),
        }
    }
}

/// Genre representation
#[derive(Debug, Clone, Serialize)]
pub struct GenreResponse {
    pub name: String,
    pub slug: String,
}

impl From<&Genre> for GenreResponse {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
            slug: genre.slug.as_str().to_string(),
        }
    }
}

/// Create request shared by categories and genres
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierRequest {
    pub name: String,
    pub slug: String,
}

/// Query parameters for category/genre lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

// ============================================================================
// Titles
// ============================================================================

/// Title representation, rating included
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: i64,
    pub name: String,
    pub year: Option<i16>,
    pub rating: Option<f64>,
    pub description: String,
    pub genre: Vec<GenreResponse>,
    pub category: Option<CategoryResponse>,
}

impl From<&Title> for TitleResponse {
    fn from(title: &Title) -> Self {
        Self {
            id: title.id,
            name: title.name.clone(),
            year: title.year,
            rating: title.rating,
            description: title.description.clone(),
            genre: title.genres.iter().map(GenreResponse::from).collect(),
            category: title.category.as_ref().map(CategoryResponse::from),
        }
    }
}

/// Title create request; genre and category are slugs
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: Option<i16>,
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub category: Option<String>,
}

/// Title partial update request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i16>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Query parameters for the title list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleListQuery {
    pub genre: Option<String>,
    pub category: Option<String>,
    pub year: Option<i16>,
    pub name: Option<String>,
}

// ============================================================================
// Reviews
// ============================================================================

/// Review representation
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub score: i16,
    pub title: String,
    pub pub_date: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            text: review.text.clone(),
            author: review.author_username.clone(),
            score: review.score.value(),
            title: review.title_name.clone(),
            pub_date: review.pub_date,
        }
    }
}

/// Review create request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i16,
}

/// Review partial update request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i16>,
}

// ============================================================================
// Comments
// ============================================================================

/// Comment representation
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub review: String,
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            review: comment.review_text.clone(),
            author: comment.author_username.clone(),
            text: comment.text.clone(),
            pub_date: comment.pub_date,
        }
    }
}

/// Comment create request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Comment partial update request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}
