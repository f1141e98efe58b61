//! Session Token Entity
//!
//! An opaque bearer credential minted after a successful confirmation-code
//! exchange. The `jti` is the string handed to the caller; subsequent
//! requests present it in the `Authorization: Bearer` header and it is
//! resolved back to the owning principal.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::value_object::user_id::UserId;

/// Session token entity
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// Unique token identifier, returned to the caller as the credential
    pub jti: Uuid,
    /// The principal this token was issued for
    pub user_id: UserId,
    /// Issuance timestamp
    pub issued_at: DateTime<Utc>,
}

impl SessionToken {
    /// Mint a new token for a principal
    pub fn issue(user_id: UserId) -> Self {
        Self {
            jti: Uuid::new_v4(),
            user_id,
            issued_at: Utc::now(),
        }
    }
}
