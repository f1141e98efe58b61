//! Sign Up Use Case
//!
//! Passwordless registration: creates (or idempotently reuses) a
//! principal for a (username, email) pair and dispatches a confirmation
//! code out of band. Possession of the code is the only proof of
//! confirmation; no confirmed flag is stored.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub username: String,
    pub email: String,
}

/// Sign up output: the identity fields, echoed
#[derive(Debug)]
pub struct SignUpOutput {
    pub username: String,
    pub email: String,
}

/// Sign up use case
pub struct SignUpUseCase<U, M>
where
    U: UserRepository,
    M: Mailer + Send + Sync,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, M> SignUpUseCase<U, M>
where
    U: UserRepository,
    M: Mailer + Send + Sync,
{
    pub fn new(user_repo: Arc<U>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        // Validate both inputs before touching the store so a single
        // response can name every offending field
        let mut fields = BTreeMap::new();
        let username = match Username::new(&input.username) {
            Ok(username) => Some(username),
            Err(e) => {
                fields.insert("username".to_string(), e.to_string());
                None
            }
        };
        let email = match Email::new(&input.email) {
            Ok(email) => Some(email),
            Err(e) => {
                fields.insert("email".to_string(), e.message().to_string());
                None
            }
        };
        let (Some(username), Some(email)) = (username, email) else {
            return Err(AuthError::Validation(fields));
        };

        // Exact pair already registered: reuse the principal and re-issue
        if let Some(user) = self.user_repo.find_by_pair(&username, &email).await? {
            self.dispatch_confirmation(&user).await;
            return Ok(Self::echo(&user));
        }

        // Independent collisions are conflicts, reported per field
        let mut fields = BTreeMap::new();
        if self.user_repo.find_by_username(&username).await?.is_some() {
            fields.insert(
                "username".to_string(),
                "A user with this username already exists".to_string(),
            );
        }
        if self.user_repo.find_by_email(&email).await?.is_some() {
            fields.insert(
                "email".to_string(),
                "A user with this email already exists".to_string(),
            );
        }
        if !fields.is_empty() {
            return Err(AuthError::Validation(fields));
        }

        let user = User::new(username, email);
        let user = match self.user_repo.create(&user).await {
            Ok(()) => user,
            // The store constraints are the real enforcement; a loss in a
            // concurrent race lands here. A same-pair loser is the
            // "already exists" branch, anything else is a field conflict.
            Err(
                AuthError::PairExists | AuthError::UsernameTaken | AuthError::EmailTaken,
            ) => match self
                .user_repo
                .find_by_pair(&user.username, &user.email)
                .await?
            {
                Some(existing) => existing,
                None => {
                    return Err(if self
                        .user_repo
                        .find_by_username(&user.username)
                        .await?
                        .is_some()
                    {
                        AuthError::UsernameTaken
                    } else {
                        AuthError::EmailTaken
                    });
                }
            },
            Err(e) => return Err(e),
        };

        tracing::info!(username = %user.username, "User signed up");

        self.dispatch_confirmation(&user).await;

        Ok(Self::echo(&user))
    }

    /// Issue a fresh code and hand it to the dispatch collaborator.
    ///
    /// Best-effort: a dispatch failure is logged and swallowed, the
    /// caller cannot distinguish delivered from not delivered.
    async fn dispatch_confirmation(&self, user: &User) {
        let code = self.config.issuer().issue(user);
        let body = format!(
            "Confirmation code for user with email {}: {}.",
            user.email, code
        );

        if let Err(e) = self
            .mailer
            .dispatch(user.email.as_str(), "Confirmation code", &body)
            .await
        {
            tracing::warn!(error = %e, username = %user.username, "Confirmation dispatch failed");
        }
    }

    fn echo(user: &User) -> SignUpOutput {
        SignUpOutput {
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}
