//! Repository Traits
//!
//! Persistence ports for the catalog and the review/comment chain.
//! Implementations are in the infrastructure layer.

use auth::models::user_id::UserId;

use crate::domain::entity::{
    category::Category, comment::Comment, genre::Genre, review::Review,
    title::{Title, TitleDraft},
};
use crate::domain::value_object::{score::Score, slug::Slug};
use crate::error::ReviewsResult;

/// Filter parameters for the title list
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    pub genre_slug: Option<String>,
    pub category_slug: Option<String>,
    pub year: Option<i16>,
    pub name: Option<String>,
}

/// Catalog repository trait (categories, genres, titles)
#[trait_variant::make(CatalogRepository: Send)]
pub trait LocalCatalogRepository {
    /// List categories, optionally narrowed by a name substring
    async fn list_categories(&self, search: Option<&str>) -> ReviewsResult<Vec<Category>>;

    /// Create a category; a slug collision surfaces as `SlugTaken`
    async fn create_category(&self, name: &str, slug: &Slug) -> ReviewsResult<Category>;

    async fn find_category_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Category>>;

    /// Delete by slug; returns false when nothing matched
    async fn delete_category_by_slug(&self, slug: &Slug) -> ReviewsResult<bool>;

    /// List genres, optionally narrowed by a name substring
    async fn list_genres(&self, search: Option<&str>) -> ReviewsResult<Vec<Genre>>;

    /// Create a genre; a slug collision surfaces as `SlugTaken`
    async fn create_genre(&self, name: &str, slug: &Slug) -> ReviewsResult<Genre>;

    async fn find_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Genre>>;

    /// Delete by slug; returns false when nothing matched
    async fn delete_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<bool>;

    /// List titles matching the filter, rating included
    async fn list_titles(&self, filter: &TitleFilter) -> ReviewsResult<Vec<Title>>;

    /// Load one title with its rating, genres and category
    async fn find_title(&self, title_id: i64) -> ReviewsResult<Option<Title>>;

    async fn create_title(&self, draft: &TitleDraft) -> ReviewsResult<Title>;

    /// Replace a title's fields; returns the fresh read model
    async fn update_title(&self, title_id: i64, draft: &TitleDraft) -> ReviewsResult<Option<Title>>;

    /// Delete a title; returns false when nothing matched
    async fn delete_title(&self, title_id: i64) -> ReviewsResult<bool>;
}

/// Review repository trait
#[trait_variant::make(ReviewRepository: Send)]
pub trait LocalReviewRepository {
    async fn list_for_title(&self, title_id: i64) -> ReviewsResult<Vec<Review>>;

    /// Resolve a review within its owning title's scope
    async fn find_for_title(&self, title_id: i64, review_id: i64) -> ReviewsResult<Option<Review>>;

    /// Whether this author already reviewed this title (early exit; the
    /// store constraint is the real enforcement)
    async fn exists_for_author(&self, title_id: i64, author_id: &UserId) -> ReviewsResult<bool>;

    /// Insert a review; a (title, author) collision surfaces as
    /// `DuplicateReview`
    async fn create(
        &self,
        title_id: i64,
        author_id: &UserId,
        text: &str,
        score: Score,
    ) -> ReviewsResult<Review>;

    /// Update text and score; author and pub_date are immutable
    async fn update(&self, review_id: i64, text: &str, score: Score) -> ReviewsResult<()>;

    async fn delete(&self, review_id: i64) -> ReviewsResult<()>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn list_for_review(&self, review_id: i64) -> ReviewsResult<Vec<Comment>>;

    /// Resolve a comment within its owning review's scope
    async fn find_for_review(
        &self,
        review_id: i64,
        comment_id: i64,
    ) -> ReviewsResult<Option<Comment>>;

    async fn create(
        &self,
        review_id: i64,
        author_id: &UserId,
        text: &str,
    ) -> ReviewsResult<Comment>;

    /// Update text; author and pub_date are immutable
    async fn update(&self, comment_id: i64, text: &str) -> ReviewsResult<()>;

    async fn delete(&self, comment_id: i64) -> ReviewsResult<()>;
}
