//! User Entity
//!
//! A registered principal: the account created by sign-up and resolved
//! from a bearer token on every authenticated request.

use chrono::{DateTime, Utc};

use crate::domain::policy::Actor;
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_role::UserRole, username::Username,
};

/// User entity
///
/// Every mutator bumps `updated_at`. Outstanding confirmation codes are
/// derived from field state, so any mutation invalidates them without
/// further bookkeeping.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Username (unique, public handle)
    pub username: Username,
    /// Email address (unique)
    pub email: Email,
    /// Role (user, moderator, admin)
    pub role: UserRole,
    /// Superuser flag; treated as role-equivalent to admin everywhere
    pub is_superuser: bool,
    /// Free-text biography
    pub bio: String,
    /// Optional given name
    pub first_name: Option<String>,
    /// Optional family name
    pub last_name: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the default role
    pub fn new(username: Username, email: Email) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            username,
            email,
            role: UserRole::default(),
            is_superuser: false,
            bio: String::new(),
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Role with the superuser flag folded in.
    ///
    /// The single place where `is_superuser` matters; every permission
    /// check goes through the effective role.
    pub fn effective_role(&self) -> UserRole {
        if self.is_superuser {
            UserRole::Admin
        } else {
            self.role
        }
    }

    /// The actor this principal presents to the authorization evaluator
    pub fn actor(&self) -> Actor {
        Actor::Principal {
            id: self.user_id,
            role: self.effective_role(),
        }
    }

    /// Update username
    pub fn set_username(&mut self, username: Username) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    /// Update email
    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Update role
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Update biography
    pub fn set_bio(&mut self, bio: String) {
        self.bio = bio;
        self.updated_at = Utc::now();
    }

    /// Update given name
    pub fn set_first_name(&mut self, first_name: Option<String>) {
        self.first_name = first_name;
        self.updated_at = Utc::now();
    }

    /// Update family name
    pub fn set_last_name(&mut self, last_name: Option<String>) {
        self.last_name = last_name;
        self.updated_at = Utc::now();
    }
}
