//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{session_token::SessionToken, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_role::UserRole, username::Username,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a unique-violation into the domain conflict it represents.
///
/// The constraint names are declared in the migrations; they are the
/// primary enforcement of the uniqueness invariants, the application
/// pre-checks are early exits only.
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    let constraint = match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            db.constraint().map(str::to_owned)
        }
        _ => None,
    };
    match constraint.as_deref() {
        Some("uq_users_username") => AuthError::UsernameTaken,
        Some("uq_users_email") => AuthError::EmailTaken,
        Some("uq_users_username_email") => AuthError::PairExists,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    email: String,
    role: String,
    is_superuser: bool,
    bio: String,
    first_name: Option<String>,
    last_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role code: {}", self.role)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            username: Username::from_db(self.username),
            email: Email::from_db(self.email),
            role,
            is_superuser: self.is_superuser,
            bio: self.bio,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const USER_COLUMNS: &str = r#"
    user_id,
    username,
    email,
    role,
    is_superuser,
    bio,
    first_name,
    last_name,
    created_at,
    updated_at
"#;

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgIdentityRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                email,
                role,
                is_superuser,
                bio,
                first_name,
                last_name,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.role.code())
        .bind(user.is_superuser)
        .bind(&user.bio)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_pair(&self, username: &Username, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 AND email = $2"
        ))
        .bind(username.as_str())
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn search(&self, term: Option<&str>) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE $1::text IS NULL OR username ILIKE '%' || $1 || '%'
            ORDER BY username
            "#
        ))
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                username = $2,
                email = $3,
                role = $4,
                is_superuser = $5,
                bio = $6,
                first_name = $7,
                last_name = $8,
                updated_at = $9
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.role.code())
        .bind(user.is_superuser)
        .bind(&user.bio)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<()> {
        sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgIdentityRepository {
    async fn create(&self, token: &SessionToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_tokens (jti, user_id, issued_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token.jti)
        .bind(token.user_id.as_uuid())
        .bind(token.issued_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_jti(&self, jti: Uuid) -> AuthResult<Option<SessionToken>> {
        #[derive(sqlx::FromRow)]
        struct TokenRow {
            jti: Uuid,
            user_id: Uuid,
            issued_at: DateTime<Utc>,
        }

        let row = sqlx::query_as::<_, TokenRow>(
            "SELECT jti, user_id, issued_at FROM session_tokens WHERE jti = $1",
        )
        .bind(jti)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| SessionToken {
            jti: r.jti,
            user_id: UserId::from_uuid(r.user_id),
            issued_at: r.issued_at,
        }))
    }
}
