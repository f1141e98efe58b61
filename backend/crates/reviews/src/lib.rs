//! Reviews (Content) Backend Module
//!
//! The catalog (categories, genres, titles), reviews and comments -
//! the resource access layer of the platform.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases; every operation takes the acting
//!   principal explicitly and consults the authorization evaluator
//!   before mutating
//! - `infra/` - Database implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Invariants
//! - At most one review per (title, author), enforced by the storage
//!   constraint with an application pre-check as early exit
//! - A title's rating is the mean of its review scores, derived at
//!   query time, never stored
//! - Review/comment ownership follows the author's identity, not role;
//!   moderators and admins override it

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{ReviewsError, ReviewsResult};
pub use infra::postgres::PgContentRepository;
pub use presentation::router::content_router;

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgContentRepository as ContentStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
