//! Identity Resolution Middleware
//!
//! Resolves the `Authorization: Bearer <token>` header into the calling
//! principal and stores it in the request extensions as [`CurrentUser`].
//! Absence of a credential - or an invalid one - yields the anonymous
//! actor; a failure only surfaces later, if and when the handler
//! attempts something that requires authentication.

use axum::body::Body;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::policy::Actor;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;

/// Middleware state
#[derive(Clone)]
pub struct IdentityState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

/// The resolved caller, stored in request extensions
#[derive(Clone)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    /// The actor this request presents to the authorization evaluator
    pub fn actor(&self) -> Actor {
        match &self.0 {
            Some(user) => user.actor(),
            None => Actor::Anonymous,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

/// Middleware that resolves the bearer token into a principal
pub async fn resolve_identity<R>(
    state: IdentityState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let user = match bearer_token(req.headers()) {
        Some(token) => match lookup_principal(&state, token).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Identity resolution failed");
                None
            }
        },
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user));

    next.run(req).await
}

/// Extract the bearer credential from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Token string -> session row -> owning principal
async fn lookup_principal<R>(state: &IdentityState<R>, token: &str) -> AuthResult<Option<User>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let Ok(jti) = token.parse::<Uuid>() else {
        return Ok(None);
    };

    let Some(session) = SessionRepository::find_by_jti(state.repo.as_ref(), jti).await? else {
        return Ok(None);
    };

    UserRepository::find_by_id(state.repo.as_ref(), &session.user_id).await
}
