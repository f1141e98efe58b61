//! Repository Traits
//!
//! Interfaces for data persistence and outbound dispatch. Implementations
//! are in the infrastructure layer.

use crate::domain::entity::{session_token::SessionToken, user::User};
use crate::domain::value_object::{email::Email, user_id::UserId, username::Username};
use crate::error::AuthResult;
use uuid::Uuid;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user.
    ///
    /// Uniqueness is enforced by the store; violations surface as
    /// `UsernameTaken` / `EmailTaken` / `PairExists`.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by the exact (username, email) pair
    async fn find_by_pair(&self, username: &Username, email: &Email) -> AuthResult<Option<User>>;

    /// List users, optionally narrowed by a username substring
    async fn search(&self, term: Option<&str>) -> AuthResult<Vec<User>>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Delete user
    async fn delete(&self, user_id: &UserId) -> AuthResult<()>;
}

/// Session token repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Persist a freshly minted token
    async fn create(&self, token: &SessionToken) -> AuthResult<()>;

    /// Resolve a bearer token by its identifier
    async fn find_by_jti(&self, jti: Uuid) -> AuthResult<Option<SessionToken>>;
}

/// Outbound message dispatch port
///
/// Fire-and-forget collaborator: callers swallow errors, so an
/// implementation may fail freely without affecting any request.
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn dispatch(&self, to: &str, subject: &str, body: &str) -> AuthResult<()>;
}
