//! Auth Routers

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{Mailer, SessionRepository, UserRepository};
use crate::infra::mailer::LogMailer;
use crate::infra::postgres::PgIdentityRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the auth router (signup / token) with the PostgreSQL repository
pub fn auth_router(repo: PgIdentityRepository, mailer: LogMailer, config: AuthConfig) -> Router {
    auth_router_generic(repo, mailer, config)
}

/// Create the users router (admin management + self-service) with the
/// PostgreSQL repository
pub fn users_router(repo: PgIdentityRepository, mailer: LogMailer, config: AuthConfig) -> Router {
    users_router_generic(repo, mailer, config)
}

/// Create a generic auth router for any repository implementation
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R, M>))
        .route("/token", post(handlers::obtain_token::<R, M>))
        .with_state(state)
}

/// Create a generic users router for any repository implementation
pub fn users_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/",
            get(handlers::list_users::<R, M>).post(handlers::create_user::<R, M>),
        )
        .route(
            "/me",
            get(handlers::get_me::<R, M>).patch(handlers::update_me::<R, M>),
        )
        .route(
            "/{username}",
            get(handlers::get_user::<R, M>)
                .patch(handlers::update_user::<R, M>)
                .delete(handlers::delete_user::<R, M>),
        )
        .with_state(state)
}
