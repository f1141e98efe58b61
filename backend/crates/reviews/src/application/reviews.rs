//! Review Use Cases
//!
//! Reviews live under a title: every operation resolves the title (or
//! the review within the title's scope) fresh, then runs the
//! authorization evaluator before mutating. Creation enforces the
//! one-review-per-author-per-title invariant twice: an application
//! pre-check as an early exit and the storage constraint as the real
//! enforcement under concurrency.

use std::sync::Arc;

use auth::models::user_id::UserId;
use auth::policy::{Action, Actor, ResourceKind};

use crate::application::authored_write;
use crate::domain::entity::review::Review;
use crate::domain::repository::{CatalogRepository, ReviewRepository};
use crate::domain::value_object::score::Score;
use crate::error::{ReviewsError, ReviewsResult};

/// Review create input
pub struct CreateReviewInput {
    pub text: String,
    pub score: i16,
}

/// Review partial update input; author and pub_date are immutable
#[derive(Default)]
pub struct UpdateReviewInput {
    pub text: Option<String>,
    pub score: Option<i16>,
}

/// Review use case
pub struct ReviewsUseCase<C, R>
where
    C: CatalogRepository,
    R: ReviewRepository,
{
    catalog: Arc<C>,
    reviews: Arc<R>,
}

impl<C, R> ReviewsUseCase<C, R>
where
    C: CatalogRepository,
    R: ReviewRepository,
{
    pub fn new(catalog: Arc<C>, reviews: Arc<R>) -> Self {
        Self { catalog, reviews }
    }

    /// List all reviews of a title (public)
    pub async fn list(&self, title_id: i64) -> ReviewsResult<Vec<Review>> {
        self.ensure_title(title_id).await?;
        self.reviews.list_for_title(title_id).await
    }

    /// Read a single review within its title's scope (public)
    pub async fn get(&self, title_id: i64, review_id: i64) -> ReviewsResult<Review> {
        self.reviews
            .find_for_title(title_id, review_id)
            .await?
            .ok_or(ReviewsError::ReviewNotFound)
    }

    /// Create a review; one per (title, author)
    pub async fn create(
        &self,
        actor: &Actor,
        title_id: i64,
        input: CreateReviewInput,
    ) -> ReviewsResult<Review> {
        let author_id = authorize(actor, Action::Create, None)?;

        let score = validate_score(input.score)?;
        self.ensure_title(title_id).await?;

        // Early exit; the uq_reviews_title_author constraint catches the
        // concurrent case and the repository reports it identically
        if self.reviews.exists_for_author(title_id, &author_id).await? {
            return Err(ReviewsError::DuplicateReview);
        }

        let review = self
            .reviews
            .create(title_id, &author_id, &input.text, score)
            .await?;

        tracing::info!(
            review_id = review.id,
            title_id,
            author = %review.author_username,
            "Review created"
        );

        Ok(review)
    }

    /// Update text/score; the row is re-resolved and the evaluator re-run
    pub async fn update(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        input: UpdateReviewInput,
    ) -> ReviewsResult<Review> {
        let mut review = self.get(title_id, review_id).await?;
        authorize(actor, Action::Update, Some(&review.author_id))?;

        if let Some(text) = input.text {
            review.text = text;
        }
        if let Some(score) = input.score {
            review.score = validate_score(score)?;
        }

        self.reviews
            .update(review.id, &review.text, review.score)
            .await?;

        Ok(review)
    }

    /// Delete a review; the row is re-resolved and the evaluator re-run
    pub async fn delete(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
    ) -> ReviewsResult<()> {
        let review = self.get(title_id, review_id).await?;
        authorize(actor, Action::Delete, Some(&review.author_id))?;

        self.reviews.delete(review.id).await?;

        tracing::info!(review_id, title_id, "Review deleted");

        Ok(())
    }

    async fn ensure_title(&self, title_id: i64) -> ReviewsResult<()> {
        if self.catalog.find_title(title_id).await?.is_none() {
            return Err(ReviewsError::TitleNotFound);
        }
        Ok(())
    }
}

fn authorize(actor: &Actor, action: Action, owner: Option<&UserId>) -> ReviewsResult<UserId> {
    authored_write(actor, action, ResourceKind::Review, owner)
}

fn validate_score(score: i16) -> ReviewsResult<Score> {
    Score::new(score).map_err(|e| ReviewsError::field("score", e.to_string()))
}
