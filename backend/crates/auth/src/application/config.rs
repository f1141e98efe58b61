//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use crate::domain::confirmation::ConfirmationCodeIssuer;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for confirmation-code HMAC signing (32 bytes)
    pub confirmation_secret: [u8; 32],
    /// Validity window of a confirmation code (default 24 hours)
    pub confirmation_code_ttl: Duration,
    /// Sender address for outbound confirmation messages
    pub mail_from: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            confirmation_secret: [0u8; 32],
            confirmation_code_ttl: Duration::from_secs(24 * 3600), // 24 hours
            mail_from: "noreply@localhost".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            confirmation_secret: secret,
            ..Default::default()
        }
    }

    /// The code issuer configured by this config
    pub fn issuer(&self) -> ConfirmationCodeIssuer {
        ConfirmationCodeIssuer::new(self.confirmation_secret, self.confirmation_code_ttl)
    }
}
