//! User Administration Use Cases
//!
//! Admin-only management of principals: list/search, create, get,
//! update (any field, including role) and delete. Every operation is
//! gated by the authorization evaluator with resource kind `Account`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::policy::{Action, Actor, Decision, ResourceKind, can_perform};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_role::UserRole, username::Username};
use crate::error::{AuthError, AuthResult};

/// Admin create input
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub role: Option<UserRole>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Admin update input; absent fields stay unchanged
#[derive(Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// User administration use case
pub struct UserAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn list(&self, actor: &Actor, search: Option<&str>) -> AuthResult<Vec<User>> {
        authorize(actor, Action::Read)?;
        self.user_repo.search(search).await
    }

    pub async fn create(&self, actor: &Actor, input: CreateUserInput) -> AuthResult<User> {
        authorize(actor, Action::Create)?;

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

        let mut user = User::new(username, email);
        if let Some(role) = input.role {
            user.role = role;
        }
        if let Some(bio) = input.bio {
            user.bio = bio;
        }
        user.first_name = input.first_name;
        user.last_name = input.last_name;

        self.user_repo
            .create(&user)
            .await
            .map_err(conflict_to_validation)?;

        tracing::info!(username = %user.username, role = %user.role, "User created by admin");

        Ok(user)
    }

    pub async fn get(&self, actor: &Actor, username: &str) -> AuthResult<User> {
        authorize(actor, Action::Read)?;
        self.find(username).await
    }

    pub async fn update(
        &self,
        actor: &Actor,
        username: &str,
        input: UpdateUserInput,
    ) -> AuthResult<User> {
        authorize(actor, Action::Update)?;

        let mut user = self.find(username).await?;

        let mut fields = BTreeMap::new();
        if let Some(new_username) = input.username {
            match Username::new(&new_username) {
                Ok(username) => user.set_username(username),
                Err(e) => {
                    fields.insert("username".to_string(), e.to_string());
                }
            }
        }
        if let Some(new_email) = input.email {
            match Email::new(&new_email) {
                Ok(email) => user.set_email(email),
                Err(e) => {
                    fields.insert("email".to_string(), e.message().to_string());
                }
            }
        }
        if !fields.is_empty() {
            return Err(AuthError::Validation(fields));
        }

        if let Some(role) = input.role {
            user.set_role(role);
        }
        if let Some(bio) = input.bio {
            user.set_bio(bio);
        }
        if let Some(first_name) = input.first_name {
            user.set_first_name(Some(first_name));
        }
        if let Some(last_name) = input.last_name {
            user.set_last_name(Some(last_name));
        }

        self.user_repo
            .update(&user)
            .await
            .map_err(conflict_to_validation)?;

        Ok(user)
    }

    pub async fn delete(&self, actor: &Actor, username: &str) -> AuthResult<()> {
        authorize(actor, Action::Delete)?;
        let user = self.find(username).await?;
        self.user_repo.delete(&user.user_id).await?;

        tracing::info!(username = %user.username, "User deleted by admin");

        Ok(())
    }

    /// Resolve a path username; anything that cannot be a username is
    /// simply not found
    async fn find(&self, username: &str) -> AuthResult<User> {
        let Ok(username) = Username::new(username) else {
            return Err(AuthError::UserNotFound);
        };
        self.user_repo
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

fn authorize(actor: &Actor, action: Action) -> AuthResult<()> {
    match can_perform(actor, action, ResourceKind::Account, None) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(reason.into()),
    }
}

/// Uniqueness conflicts from the store, reported per field like any
/// other validation failure
pub(crate) fn conflict_to_validation(err: AuthError) -> AuthError {
    match err {
        AuthError::UsernameTaken | AuthError::PairExists => {
            AuthError::field("username", "A user with this username already exists")
        }
        AuthError::EmailTaken => {
            AuthError::field("email", "A user with this email already exists")
        }
        other => other,
    }
}
