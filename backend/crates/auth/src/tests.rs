//! Use-case tests for the auth crate
//!
//! Runs the sign-up / token-exchange / user-management flows against
//! in-memory repository doubles.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::application::{
    AuthConfig, CreateUserInput, ObtainTokenInput, ObtainTokenUseCase, SelfProfileUseCase,
    SignUpInput, SignUpUseCase, UpdateProfileInput, UpdateUserInput, UserAdminUseCase,
};
use crate::domain::entity::{session_token::SessionToken, user::User};
use crate::domain::policy::Actor;
use crate::domain::repository::{Mailer, SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_role::UserRole, username::Username,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// In-memory doubles
// ============================================================================

#[derive(Clone, Default)]
struct InMemoryStore {
    users: Arc<Mutex<Vec<User>>>,
    sessions: Arc<Mutex<Vec<SessionToken>>>,
}

impl InMemoryStore {
    fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().unwrap();
        // Mirrors the store constraints: pair first, then the columns
        if users
            .iter()
            .any(|u| u.username == user.username && u.email == user.email)
        {
            return Err(AuthError::PairExists);
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::UsernameTaken);
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_id == *user_id)
            .cloned())
    }

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == *username)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn find_by_pair(&self, username: &Username, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == *username && u.email == *email)
            .cloned())
    }

    async fn search(&self, term: Option<&str>) -> AuthResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| match term {
                Some(t) => u
                    .username
                    .as_str()
                    .to_lowercase()
                    .contains(&t.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.user_id != user.user_id && u.username == user.username)
        {
            return Err(AuthError::UsernameTaken);
        }
        if users
            .iter()
            .any(|u| u.user_id != user.user_id && u.email == user.email)
        {
            return Err(AuthError::EmailTaken);
        }
        if let Some(stored) = users.iter_mut().find(|u| u.user_id == user.user_id) {
            *stored = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<()> {
        self.users.lock().unwrap().retain(|u| u.user_id != *user_id);
        Ok(())
    }
}

impl SessionRepository for InMemoryStore {
    async fn create(&self, token: &SessionToken) -> AuthResult<()> {
        self.sessions.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn find_by_jti(&self, jti: Uuid) -> AuthResult<Option<SessionToken>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.jti == jti)
            .cloned())
    }
}

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String, String)>>>,
    fail: bool,
}

impl RecordingMailer {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn last_body(&self) -> String {
        self.sent.lock().unwrap().last().unwrap().2.clone()
    }
}

impl Mailer for RecordingMailer {
    async fn dispatch(&self, to: &str, subject: &str, body: &str) -> AuthResult<()> {
        if self.fail {
            return Err(AuthError::Internal("smtp unreachable".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn fixtures() -> (
    Arc<InMemoryStore>,
    Arc<RecordingMailer>,
    Arc<AuthConfig>,
) {
    (
        Arc::new(InMemoryStore::default()),
        Arc::new(RecordingMailer::default()),
        Arc::new(AuthConfig::default()),
    )
}

fn sign_up_use_case(
    store: &Arc<InMemoryStore>,
    mailer: &Arc<RecordingMailer>,
    config: &Arc<AuthConfig>,
) -> SignUpUseCase<InMemoryStore, RecordingMailer> {
    SignUpUseCase::new(store.clone(), mailer.clone(), config.clone())
}

fn token_use_case(
    store: &Arc<InMemoryStore>,
    config: &Arc<AuthConfig>,
) -> ObtainTokenUseCase<InMemoryStore, InMemoryStore> {
    ObtainTokenUseCase::new(store.clone(), store.clone(), config.clone())
}

/// Pull the confirmation code out of a dispatched message body
fn code_from_body(body: &str) -> String {
    body.rsplit_once(": ")
        .map(|(_, code)| code.trim_end_matches('.').to_string())
        .unwrap()
}

async fn sign_up(
    store: &Arc<InMemoryStore>,
    mailer: &Arc<RecordingMailer>,
    config: &Arc<AuthConfig>,
    username: &str,
    email: &str,
) -> AuthResult<crate::application::SignUpOutput> {
    sign_up_use_case(store, mailer, config)
        .execute(SignUpInput {
            username: username.to_string(),
            email: email.to_string(),
        })
        .await
}

fn admin_actor() -> Actor {
    Actor::Principal {
        id: UserId::new(),
        role: UserRole::Admin,
    }
}

// ============================================================================
// Sign-up
// ============================================================================

mod sign_up_tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_principal_and_dispatches_code() {
        let (store, mailer, config) = fixtures();

        let output = sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();

        assert_eq!(output.username, "alice");
        assert_eq!(output.email, "alice@example.com");
        assert_eq!(store.user_count(), 1);
        assert_eq!(mailer.sent_count(), 1);

        let user = store
            .find_by_username(&Username::new("alice").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(!user.is_superuser);
    }

    #[tokio::test]
    async fn test_reserved_username_rejected_in_any_case() {
        let (store, mailer, config) = fixtures();

        for username in ["me", "Me", "mE", "ME"] {
            let err = sign_up(&store, &mailer, &config, username, "me@example.com")
                .await
                .unwrap_err();
            match err {
                AuthError::Validation(fields) => {
                    assert!(fields.contains_key("username"), "{username}")
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert_eq!(store.user_count(), 0);
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_exact_pair_is_idempotent_and_redispatches() {
        let (store, mailer, config) = fixtures();

        sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();
        let output = sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();

        assert_eq!(output.username, "alice");
        assert_eq!(store.user_count(), 1);
        assert_eq!(mailer.sent_count(), 2);
    }

    #[tokio::test]
    async fn test_username_collision_with_different_email() {
        let (store, mailer, config) = fixtures();

        sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();
        let err = sign_up(&store, &mailer, &config, "alice", "other@example.com")
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(fields) => {
                assert!(fields.contains_key("username"));
                assert!(!fields.contains_key("email"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_email_collision_with_different_username() {
        let (store, mailer, config) = fixtures();

        sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();
        let err = sign_up(&store, &mailer, &config, "bob", "alice@example.com")
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(fields) => {
                assert!(fields.contains_key("email"));
                assert!(!fields.contains_key("username"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_username_and_email_reported_together() {
        let (store, mailer, config) = fixtures();

        let err = sign_up(&store, &mailer, &config, "not valid!", "not-an-email")
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(fields) => {
                assert!(fields.contains_key("username"));
                assert!(fields.contains_key("email"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_failure_never_fails_the_request() {
        let store = Arc::new(InMemoryStore::default());
        let mailer = Arc::new(RecordingMailer::failing());
        let config = Arc::new(AuthConfig::default());

        let output = sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();

        assert_eq!(output.username, "alice");
        assert_eq!(store.user_count(), 1);
    }
}

// ============================================================================
// Token exchange
// ============================================================================

mod token_tests {
    use super::*;

    #[tokio::test]
    async fn test_exchange_valid_code_for_token() {
        let (store, mailer, config) = fixtures();

        sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();
        let code = code_from_body(&mailer.last_body());

        let output = token_use_case(&store, &config)
            .execute(ObtainTokenInput {
                username: "alice".to_string(),
                confirmation_code: code,
            })
            .await
            .unwrap();

        // The credential is the token's jti
        let jti: Uuid = output.token.parse().unwrap();
        assert_eq!(store.session_count(), 1);

        let session = SessionRepository::find_by_jti(store.as_ref(), jti)
            .await
            .unwrap()
            .unwrap();
        let user = store
            .find_by_username(&Username::new("alice").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_code_remains_valid_until_state_changes() {
        let (store, mailer, config) = fixtures();

        sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();
        let code = code_from_body(&mailer.last_body());

        for _ in 0..2 {
            token_use_case(&store, &config)
                .execute(ObtainTokenInput {
                    username: "alice".to_string(),
                    confirmation_code: code.clone(),
                })
                .await
                .unwrap();
        }
        assert_eq!(store.session_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_username_is_not_found() {
        let (store, _, config) = fixtures();

        let err = token_use_case(&store, &config)
            .execute(ObtainTokenInput {
                username: "nobody".to_string(),
                confirmation_code: "whatever".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_wrong_code_rejected_and_no_token_minted() {
        let (store, mailer, config) = fixtures();

        sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();

        let err = token_use_case(&store, &config)
            .execute(ObtainTokenInput {
                username: "alice".to_string(),
                confirmation_code: "1a2b3c-bogus".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidConfirmationCode));
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_principal_mutation_invalidates_outstanding_code() {
        let (store, mailer, config) = fixtures();

        sign_up(&store, &mailer, &config, "alice", "alice@example.com")
            .await
            .unwrap();
        let code = code_from_body(&mailer.last_body());

        // Admin edits the principal between issuance and exchange
        let admin = admin_actor();
        UserAdminUseCase::new(store.clone())
            .update(
                &admin,
                "alice",
                UpdateUserInput {
                    role: Some(UserRole::Moderator),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = token_use_case(&store, &config)
            .execute(ObtainTokenInput {
                username: "alice".to_string(),
                confirmation_code: code,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidConfirmationCode));
        assert_eq!(store.session_count(), 0);
    }
}

// ============================================================================
// User administration & self-service
// ============================================================================

mod user_admin_tests {
    use super::*;

    async fn seed_user(store: &Arc<InMemoryStore>, username: &str, email: &str) -> User {
        let user = User::new(Username::new(username).unwrap(), Email::new(email).unwrap());
        UserRepository::create(store.as_ref(), &user).await.unwrap();
        user
    }

    #[tokio::test]
    async fn test_anonymous_denied_before_anything_else() {
        let (store, _, _) = fixtures();
        let use_case = UserAdminUseCase::new(store.clone());

        let err = use_case.list(&Actor::Anonymous, None).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_plain_user_forbidden() {
        let (store, _, _) = fixtures();
        let user = seed_user(&store, "alice", "alice@example.com").await;
        let use_case = UserAdminUseCase::new(store.clone());

        let err = use_case.list(&user.actor(), None).await.unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));
    }

    #[tokio::test]
    async fn test_superuser_is_admin_equivalent() {
        let (store, _, _) = fixtures();
        let mut user = seed_user(&store, "root_like", "root@example.com").await;
        user.is_superuser = true;

        let use_case = UserAdminUseCase::new(store.clone());
        assert!(use_case.list(&user.actor(), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_create_and_search() {
        let (store, _, _) = fixtures();
        let admin = admin_actor();
        let use_case = UserAdminUseCase::new(store.clone());

        use_case
            .create(
                &admin,
                CreateUserInput {
                    username: "bob".to_string(),
                    email: "bob@example.com".to_string(),
                    role: Some(UserRole::Moderator),
                    bio: None,
                    first_name: None,
                    last_name: None,
                },
            )
            .await
            .unwrap();
        seed_user(&store, "carol", "carol@example.com").await;

        let hits = use_case.list(&admin, Some("bo")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username.as_str(), "bob");
        assert_eq!(hits[0].role, UserRole::Moderator);

        let all = use_case.list(&admin, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_admin_get_unknown_user_is_not_found() {
        let (store, _, _) = fixtures();
        let use_case = UserAdminUseCase::new(store.clone());

        let err = use_case.get(&admin_actor(), "nobody").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_admin_may_change_role() {
        let (store, _, _) = fixtures();
        seed_user(&store, "alice", "alice@example.com").await;
        let use_case = UserAdminUseCase::new(store.clone());

        let updated = use_case
            .update(
                &admin_actor(),
                "alice",
                UpdateUserInput {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_admin_delete() {
        let (store, _, _) = fixtures();
        seed_user(&store, "alice", "alice@example.com").await;
        let use_case = UserAdminUseCase::new(store.clone());

        use_case.delete(&admin_actor(), "alice").await.unwrap();
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_self_service_update_preserves_role() {
        let (store, _, _) = fixtures();
        let user = seed_user(&store, "alice", "alice@example.com").await;

        let updated = SelfProfileUseCase::new(store.clone())
            .update(
                user,
                UpdateProfileInput {
                    bio: Some("reviews things".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.bio, "reviews things");
        assert_eq!(updated.role, UserRole::User);

        let stored = store
            .find_by_username(&Username::new("alice").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.role, UserRole::User);
        assert_eq!(stored.bio, "reviews things");
    }

    #[tokio::test]
    async fn test_self_service_username_conflict_is_field_mapped() {
        let (store, _, _) = fixtures();
        seed_user(&store, "alice", "alice@example.com").await;
        let bob = seed_user(&store, "bob", "bob@example.com").await;

        let err = SelfProfileUseCase::new(store.clone())
            .update(
                bob,
                UpdateProfileInput {
                    username: Some("alice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        match err {
            AuthError::Validation(fields) => assert!(fields.contains_key("username")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
