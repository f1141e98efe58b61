//! Self-Service Profile Use Case
//!
//! Any authenticated principal may read and edit their own record
//! through this path, regardless of role. The role field is not
//! editable here: whatever the request carries, the stored role is
//! preserved.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::user_admin::conflict_to_validation;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::{AuthError, AuthResult};

/// Self-service update input; absent fields stay unchanged.
///
/// There is deliberately no role field.
#[derive(Default)]
pub struct UpdateProfileInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Self-service profile use case
pub struct SelfProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> SelfProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Apply a partial edit to the calling principal's own record
    pub async fn update(&self, user: User, input: UpdateProfileInput) -> AuthResult<User> {
        let mut user = user;

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
}
