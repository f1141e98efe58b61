//! Comment Use Cases
//!
//! Comments hang off a review, one nesting level below it: every
//! operation resolves the review within its title's scope first, then
//! the comment within the review's scope, and re-runs the authorization
//! evaluator before mutating. Unlike reviews there is no per-author
//! uniqueness.

use std::sync::Arc;

use auth::models::user_id::UserId;
use auth::policy::{Action, Actor, ResourceKind};

use crate::application::authored_write;
use crate::domain::entity::comment::Comment;
use crate::domain::repository::{CommentRepository, ReviewRepository};
use crate::error::{ReviewsError, ReviewsResult};

/// Comment create input
pub struct CreateCommentInput {
    pub text: String,
}

/// Comment partial update input; author and pub_date are immutable
#[derive(Default)]
pub struct UpdateCommentInput {
    pub text: Option<String>,
}

/// Comment use case
pub struct CommentsUseCase<R, Co>
where
    R: ReviewRepository,
    Co: CommentRepository,
{
    reviews: Arc<R>,
    comments: Arc<Co>,
}

impl<R, Co> CommentsUseCase<R, Co>
where
    R: ReviewRepository,
    Co: CommentRepository,
{
    pub fn new(reviews: Arc<R>, comments: Arc<Co>) -> Self {
        Self { reviews, comments }
    }

    /// List all comments of a review (public)
    pub async fn list(&self, title_id: i64, review_id: i64) -> ReviewsResult<Vec<Comment>> {
        self.ensure_review(title_id, review_id).await?;
        self.comments.list_for_review(review_id).await
    }

    /// Read a single comment within its review's scope (public)
    pub async fn get(
        &self,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> ReviewsResult<Comment> {
        self.ensure_review(title_id, review_id).await?;
        self.comments
            .find_for_review(review_id, comment_id)
            .await?
            .ok_or(ReviewsError::CommentNotFound)
    }

    /// Create a comment under a review
    pub async fn create(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        input: CreateCommentInput,
    ) -> ReviewsResult<Comment> {
        let author_id = authorize(actor, Action::Create, None)?;

        self.ensure_review(title_id, review_id).await?;

        let comment = self
            .comments
            .create(review_id, &author_id, &input.text)
            .await?;

        tracing::info!(
            comment_id = comment.id,
            review_id,
            author = %comment.author_username,
            "Comment created"
        );

        Ok(comment)
    }

    /// Update text; the row is re-resolved and the evaluator re-run
    pub async fn update(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
        input: UpdateCommentInput,
    ) -> ReviewsResult<Comment> {
        let mut comment = self.get(title_id, review_id, comment_id).await?;
        authorize(actor, Action::Update, Some(&comment.author_id))?;

        if let Some(text) = input.text {
            comment.text = text;
        }

        self.comments.update(comment.id, &comment.text).await?;

        Ok(comment)
    }

    /// Delete a comment; the row is re-resolved and the evaluator re-run
    pub async fn delete(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> ReviewsResult<()> {
        let comment = self.get(title_id, review_id, comment_id).await?;
        authorize(actor, Action::Delete, Some(&comment.author_id))?;

        self.comments.delete(comment.id).await?;

        tracing::info!(comment_id, review_id, "Comment deleted");

        Ok(())
    }

    async fn ensure_review(&self, title_id: i64, review_id: i64) -> ReviewsResult<()> {
        if self
            .reviews
            .find_for_title(title_id, review_id)
            .await?
            .is_none()
        {
            return Err(ReviewsError::ReviewNotFound);
        }
        Ok(())
    }
}

fn authorize(actor: &Actor, action: Action, owner: Option<&UserId>) -> ReviewsResult<UserId> {
    authored_write(actor, action, ResourceKind::Comment, owner)
}
