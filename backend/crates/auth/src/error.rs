//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::policy::DenyReason;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Referenced user does not exist
    #[error("User not found")]
    UserNotFound,

    /// Malformed or conflicting input, with a field -> message map
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    /// Username collides with a different existing principal
    #[error("A user with this username already exists")]
    UsernameTaken,

    /// Email collides with a different existing principal
    #[error("A user with this email already exists")]
    EmailTaken,

    /// The exact (username, email) pair already exists.
    ///
    /// Never surfaces: sign-up folds it into the idempotent re-issue
    /// branch.
    #[error("User already exists")]
    PairExists,

    /// Confirmation code failed validation
    #[error("Invalid confirmation code")]
    InvalidConfirmationCode,

    /// No or invalid credential on a path that needs one
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated but insufficiently privileged
    #[error("Insufficient permissions")]
    Forbidden,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Build a validation error for a single field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), message.into());
        AuthError::Validation(fields)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Validation(_)
            | AuthError::UsernameTaken
            | AuthError::EmailTaken
            | AuthError::InvalidConfirmationCode => StatusCode::BAD_REQUEST,
            AuthError::PairExists => StatusCode::CONFLICT,
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Validation(_)
            | AuthError::UsernameTaken
            | AuthError::EmailTaken
            | AuthError::InvalidConfirmationCode => ErrorKind::BadRequest,
            AuthError::PairExists => ErrorKind::Conflict,
            AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError, mapping field-level detail where present
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(fields) => AppError::validation(fields.clone()),
            AuthError::UsernameTaken => {
                AppError::bad_request("Validation failed").with_field("username", self.to_string())
            }
            AuthError::EmailTaken => {
                AppError::bad_request("Validation failed").with_field("email", self.to_string())
            }
            AuthError::InvalidConfirmationCode => AppError::bad_request("Validation failed")
                .with_field("confirmation_code", self.to_string()),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidConfirmationCode => {
                tracing::warn!("Confirmation code rejected");
            }
            AuthError::Unauthenticated | AuthError::Forbidden => {
                tracing::warn!(error = %self, "Request denied");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<DenyReason> for AuthError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => AuthError::Unauthenticated,
            DenyReason::Forbidden => AuthError::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidConfirmationCode.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_field_map_carried_to_app_error() {
        let err = AuthError::field("username", "This username is reserved");
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 400);
        assert_eq!(
            app.fields().get("username").map(String::as_str),
            Some("This username is reserved")
        );
    }

    #[test]
    fn test_confirmation_code_error_names_its_field() {
        let app = AuthError::InvalidConfirmationCode.to_app_error();
        assert!(app.fields().contains_key("confirmation_code"));
    }

    #[test]
    fn test_deny_reason_mapping() {
        assert!(matches!(
            AuthError::from(DenyReason::Unauthenticated),
            AuthError::Unauthenticated
        ));
        assert!(matches!(
            AuthError::from(DenyReason::Forbidden),
            AuthError::Forbidden
        ));
    }
}
