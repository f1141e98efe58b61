//! Application Layer
//!
//! Use cases orchestrating the domain.

pub mod catalog;
pub mod comments;
pub mod reviews;

pub use catalog::{CatalogUseCase, ClassifierInput, CreateTitleInput, UpdateTitleInput};
pub use comments::{CommentsUseCase, CreateCommentInput, UpdateCommentInput};
pub use reviews::{CreateReviewInput, ReviewsUseCase, UpdateReviewInput};

use auth::models::user_id::UserId;
use auth::policy::{Action, Actor, Decision, ResourceKind, can_perform};

use crate::error::{ReviewsError, ReviewsResult};

/// Run the evaluator for an authored resource and hand back the acting
/// principal's id.
///
/// Only write paths come through here; anonymous callers are denied as
/// unauthenticated before the ownership argument matters.
pub(crate) fn authored_write(
    actor: &Actor,
    action: Action,
    resource: ResourceKind,
    owner: Option<&UserId>,
) -> ReviewsResult<UserId> {
    match can_perform(actor, action, resource, owner) {
        Decision::Allow => match actor {
            Actor::Principal { id, .. } => Ok(*id),
            Actor::Anonymous => Err(ReviewsError::Unauthenticated),
        },
        Decision::Deny(reason) => Err(reason.into()),
    }
}
