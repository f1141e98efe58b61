//! Obtain Token Use Case
//!
//! Exchanges a valid confirmation code for a bearer session token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::session_token::SessionToken;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::username::Username;
use crate::error::{AuthError, AuthResult};

/// Token exchange input
pub struct ObtainTokenInput {
    pub username: String,
    pub confirmation_code: String,
}

/// Token exchange output
#[derive(Debug)]
pub struct ObtainTokenOutput {
    /// Opaque bearer credential (the token's jti)
    pub token: String,
}

/// Obtain token use case
pub struct ObtainTokenUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> ObtainTokenUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: ObtainTokenInput) -> AuthResult<ObtainTokenOutput> {
        // A username that cannot exist is a validation failure; only a
        // well-formed but unknown one is NotFound
        let username = Username::new(&input.username)
            .map_err(|e| AuthError::field("username", e.to_string()))?;

        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // The code is re-derived from current principal state; any
        // mutation since issuance makes this check fail
        if !self.config.issuer().check(&user, &input.confirmation_code) {
            return Err(AuthError::InvalidConfirmationCode);
        }

        let token = SessionToken::issue(user.user_id);
        self.session_repo.create(&token).await?;

        tracing::info!(username = %user.username, jti = %token.jti, "Session token issued");

        Ok(ObtainTokenOutput {
            token: token.jti.to_string(),
        })
    }
}
