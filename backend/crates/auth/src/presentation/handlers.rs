//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CreateUserInput, ObtainTokenInput, ObtainTokenUseCase, SelfProfileUseCase, SignUpInput,
    SignUpUseCase, UpdateProfileInput, UpdateUserInput, UserAdminUseCase,
};
use crate::domain::policy::Actor;
use crate::domain::repository::{Mailer, SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    CreateUserRequest, ListUsersQuery, SignUpRequest, SignUpResponse, TokenRequest, TokenResponse,
    UpdateMeRequest, UpdateUserRequest, UserResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, M>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

/// The actor of the request; anonymous when the identity middleware is
/// absent or resolved nothing
fn actor_of(current: &Option<Extension<CurrentUser>>) -> Actor {
    current
        .as_ref()
        .map(|Extension(user)| user.actor())
        .unwrap_or(Actor::Anonymous)
}

// ============================================================================
// Sign Up / Token
// ============================================================================

/// POST /auth/signup
pub async fn sign_up<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Json<SignUpResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignUpInput {
            username: req.username,
            email: req.email,
        })
        .await?;

    Ok(Json(SignUpResponse {
        username: output.username,
        email: output.email,
    }))
}

/// POST /auth/token
pub async fn obtain_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<TokenRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = ObtainTokenUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(ObtainTokenInput {
            username: req.username,
            confirmation_code: req.confirmation_code,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: output.token,
    }))
}

// ============================================================================
// User Administration
// ============================================================================

/// GET /users
pub async fn list_users<R, M>(
    State(state): State<AuthAppState<R, M>>,
    current: Option<Extension<CurrentUser>>,
    Query(query): Query<ListUsersQuery>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = UserAdminUseCase::new(state.repo.clone());
    let users = use_case
        .list(&actor_of(&current), query.search.as_deref())
        .await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// POST /users
pub async fn create_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    current: Option<Extension<CurrentUser>>,
    Json(req): Json<CreateUserRequest>,
) -> AuthResult<(StatusCode, Json<UserResponse>)>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = UserAdminUseCase::new(state.repo.clone());
    let user = use_case
        .create(
            &actor_of(&current),
            CreateUserInput {
                username: req.username,
                email: req.email,
                role: req.role,
                bio: req.bio,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /users/{username}
pub async fn get_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    current: Option<Extension<CurrentUser>>,
    Path(username): Path<String>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = UserAdminUseCase::new(state.repo.clone());
    let user = use_case.get(&actor_of(&current), &username).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /users/{username}
pub async fn update_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    current: Option<Extension<CurrentUser>>,
    Path(username): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = UserAdminUseCase::new(state.repo.clone());
    let user = use_case
        .update(
            &actor_of(&current),
            &username,
            UpdateUserInput {
                username: req.username,
                email: req.email,
                role: req.role,
                bio: req.bio,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{username}
pub async fn delete_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    current: Option<Extension<CurrentUser>>,
    Path(username): Path<String>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = UserAdminUseCase::new(state.repo.clone());
    use_case.delete(&actor_of(&current), &username).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Self-Service Profile
// ============================================================================

/// GET /users/me
pub async fn get_me<R, M>(
    State(_state): State<AuthAppState<R, M>>,
    current: Option<Extension<CurrentUser>>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let user = current
        .as_ref()
        .and_then(|Extension(user)| user.user())
        .ok_or(AuthError::Unauthenticated)?;

    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/me
pub async fn update_me<R, M>(
    State(state): State<AuthAppState<R, M>>,
    current: Option<Extension<CurrentUser>>,
    Json(req): Json<UpdateMeRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let user = current
        .as_ref()
        .and_then(|Extension(user)| user.user())
        .cloned()
        .ok_or(AuthError::Unauthenticated)?;

    let use_case = SelfProfileUseCase::new(state.repo.clone());
    let user = use_case
        .update(
            user,
            UpdateProfileInput {
                username: req.username,
                email: req.email,
                bio: req.bio,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(&user)))
}
