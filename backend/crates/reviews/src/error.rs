//! Reviews Error Types
//!
//! Content-side error variants bridging to the unified
//! `kernel::error::AppError` system, same shape as the auth crate's.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::collections::BTreeMap;
use thiserror::Error;

use auth::policy::DenyReason;

/// Reviews-specific result type alias
pub type ReviewsResult<T> = Result<T, ReviewsError>;

/// Reviews-specific error variants
#[derive(Debug, Error)]
pub enum ReviewsError {
    /// Referenced title does not exist
    #[error("Title not found")]
    TitleNotFound,

    /// Referenced review does not exist (under the given title)
    #[error("Review not found")]
    ReviewNotFound,

    /// Referenced comment does not exist (under the given review)
    #[error("Comment not found")]
    CommentNotFound,

    /// Referenced category does not exist
    #[error("Category not found")]
    CategoryNotFound,

    /// Referenced genre does not exist
    #[error("Genre not found")]
    GenreNotFound,

    /// Malformed or conflicting input, with a field -> message map
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    /// The author already reviewed this title.
    ///
    /// Produced by the pre-check and by the storage constraint alike, so
    /// a losing concurrent writer sees the same outcome.
    #[error("Review already exists")]
    DuplicateReview,

    /// Slug collides with an existing category/genre
    #[error("This slug is already in use")]
    SlugTaken,

    /// No or invalid credential on a write path
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated but not the author and not a moderator
    #[error("Insufficient permissions")]
    Forbidden,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReviewsError {
    /// Build a validation error for a single field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), message.into());
        ReviewsError::Validation(fields)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReviewsError::TitleNotFound
            | ReviewsError::ReviewNotFound
            | ReviewsError::CommentNotFound
            | ReviewsError::CategoryNotFound
            | ReviewsError::GenreNotFound => StatusCode::NOT_FOUND,
            ReviewsError::Validation(_)
            | ReviewsError::DuplicateReview
            | ReviewsError::SlugTaken => StatusCode::BAD_REQUEST,
            ReviewsError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ReviewsError::Forbidden => StatusCode::FORBIDDEN,
            ReviewsError::Database(_) | ReviewsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReviewsError::TitleNotFound
            | ReviewsError::ReviewNotFound
            | ReviewsError::CommentNotFound
            | ReviewsError::CategoryNotFound
            | ReviewsError::GenreNotFound => ErrorKind::NotFound,
            ReviewsError::Validation(_)
            | ReviewsError::DuplicateReview
            | ReviewsError::SlugTaken => ErrorKind::BadRequest,
            ReviewsError::Unauthenticated => ErrorKind::Unauthorized,
            ReviewsError::Forbidden => ErrorKind::Forbidden,
            ReviewsError::Database(_) | ReviewsError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError, mapping field-level detail where present
    pub fn to_app_error(&self) -> AppError {
        match self {
            ReviewsError::Validation(fields) => AppError::validation(fields.clone()),
            ReviewsError::DuplicateReview => {
                AppError::bad_request("Validation failed").with_field("review", self.to_string())
            }
            ReviewsError::SlugTaken => {
                AppError::bad_request("Validation failed").with_field("slug", self.to_string())
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ReviewsError::Database(e) => {
                tracing::error!(error = %e, "Reviews database error");
            }
            ReviewsError::Internal(msg) => {
                tracing::error!(message = %msg, "Reviews internal error");
            }
            ReviewsError::Unauthenticated | ReviewsError::Forbidden => {
                tracing::warn!(error = %self, "Request denied");
            }
            _ => {
                tracing::debug!(error = %self, "Reviews error");
            }
        }
    }
}

impl IntoResponse for ReviewsError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<DenyReason> for ReviewsError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => ReviewsError::Unauthenticated,
            DenyReason::Forbidden => ReviewsError::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ReviewsError::TitleNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ReviewsError::DuplicateReview.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ReviewsError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ReviewsError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_duplicate_review_is_field_mapped() {
        let app = ReviewsError::DuplicateReview.to_app_error();
        assert_eq!(app.status_code(), 400);
        assert!(app.fields().contains_key("review"));
    }

    #[test]
    fn test_deny_reason_mapping() {
        assert!(matches!(
            ReviewsError::from(DenyReason::Unauthenticated),
            ReviewsError::Unauthenticated
        ));
        assert!(matches!(
            ReviewsError::from(DenyReason::Forbidden),
            ReviewsError::Forbidden
        ));
    }
}
