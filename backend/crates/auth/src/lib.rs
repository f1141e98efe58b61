//! Auth (Identity & Access) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, policy, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementation, dispatch collaborator
//! - `presentation/` - HTTP handlers, DTOs, routers, middleware
//!
//! ## Features
//! - Passwordless sign-up: a confirmation code is dispatched out of
//!   band and later exchanged for a bearer session token
//! - Three-tier role model (user, moderator, admin) with a superuser
//!   flag folded into admin
//! - A single pure authorization evaluator consulted before every write
//! - Admin user management and self-service profile editing
//!
//! ## Security Model
//! - Confirmation codes are HMAC-derived from principal state and
//!   time-windowed; any profile change invalidates outstanding codes
//! - Session tokens are opaque server-side rows resolved per request
//! - No passwords are stored anywhere

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::mailer::LogMailer;
pub use infra::postgres::PgIdentityRepository;
pub use presentation::middleware::{CurrentUser, IdentityState, resolve_identity};
pub use presentation::router::{auth_router, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod policy {
    pub use crate::domain::policy::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgIdentityRepository as IdentityStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
