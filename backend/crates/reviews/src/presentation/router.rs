//! Content Router

use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

use crate::domain::repository::{CatalogRepository, CommentRepository, ReviewRepository};
use crate::infra::postgres::PgContentRepository;
use crate::presentation::handlers::{self, ContentAppState};

/// Create the content router with the PostgreSQL repository
pub fn content_router(repo: PgContentRepository) -> Router {
    content_router_generic(repo)
}

/// Create a generic content router for any repository implementation
pub fn content_router_generic<S>(repo: S) -> Router
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let state = ContentAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories::<S>).post(handlers::create_category::<S>),
        )
        .route("/categories/{slug}", delete(handlers::delete_category::<S>))
        .route(
            "/genres",
            get(handlers::list_genres::<S>).post(handlers::create_genre::<S>),
        )
        .route("/genres/{slug}", delete(handlers::delete_genre::<S>))
        .route(
            "/titles",
            get(handlers::list_titles::<S>).post(handlers::create_title::<S>),
        )
        .route(
            "/titles/{title_id}",
            get(handlers::get_title::<S>)
                .patch(handlers::update_title::<S>)
                .delete(handlers::delete_title::<S>),
        )
        .route(
            "/titles/{title_id}/reviews",
            get(handlers::list_reviews::<S>).post(handlers::create_review::<S>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(handlers::get_review::<S>)
                .patch(handlers::update_review::<S>)
                .delete(handlers::delete_review::<S>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(handlers::list_comments::<S>).post(handlers::create_comment::<S>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(handlers::get_comment::<S>)
                .patch(handlers::update_comment::<S>)
                .delete(handlers::delete_comment::<S>),
        )
        .with_state(state)
}
