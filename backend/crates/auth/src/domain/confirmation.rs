//! Confirmation Code Issuer
//!
//! Codes are never stored. A code is a deterministic function of the
//! owning principal's state and an issuance timestamp:
//!
//! ```text
//! <timestamp-base36>-<base64url(truncated HMAC-SHA256)>
//! ```
//!
//! Two properties follow and are relied on elsewhere:
//! - any mutation of the principal invalidates every outstanding code
//!   (the entity bumps `updated_at` on every setter, and `updated_at`
//!   is part of the MAC input)
//! - a code stays valid for repeated exchanges until its window elapses
//!   or the principal changes; there is no used-flag

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;

use crate::domain::entity::user::User;

type HmacSha256 = Hmac<Sha256>;

/// Number of MAC bytes kept in the code
const SIG_BYTES: usize = 12;

/// Issues and validates principal-bound confirmation codes
#[derive(Clone)]
pub struct ConfirmationCodeIssuer {
    secret: [u8; 32],
    ttl: Duration,
}

impl ConfirmationCodeIssuer {
    pub fn new(secret: [u8; 32], ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Issue a code for the principal's current state
    pub fn issue(&self, user: &User) -> String {
        self.issue_at(user, Utc::now())
    }

    /// Validate a code against the principal's current state
    pub fn check(&self, user: &User, code: &str) -> bool {
        self.check_at(user, code, Utc::now())
    }

    fn issue_at(&self, user: &User, at: DateTime<Utc>) -> String {
        let ts = at.timestamp().max(0);
        let sig = self.signature(user, ts);
        format!("{}-{}", to_base36(ts), URL_SAFE_NO_PAD.encode(sig))
    }

    fn check_at(&self, user: &User, code: &str, now: DateTime<Utc>) -> bool {
        let Some((ts_part, sig_part)) = code.split_once('-') else {
            return false;
        };
        let Some(ts) = from_base36(ts_part) else {
            return false;
        };

        // Window check: codes from the future are as invalid as expired ones
        let age = now.timestamp() - ts;
        if age < 0 || age as u64 > self.ttl.as_secs() {
            return false;
        }

        let Ok(sig) = URL_SAFE_NO_PAD.decode(sig_part) else {
            return false;
        };
        if sig.len() != SIG_BYTES {
            return false;
        }

        // Constant-time comparison via the Mac verify API
        self.mac_for(user, ts).verify_truncated_left(&sig).is_ok()
    }

    fn signature(&self, user: &User, ts: i64) -> [u8; SIG_BYTES] {
        let digest = self.mac_for(user, ts).finalize().into_bytes();
        let mut sig = [0u8; SIG_BYTES];
        sig.copy_from_slice(&digest[..SIG_BYTES]);
        sig
    }

    /// MAC over the full mutable principal state plus the timestamp.
    ///
    /// `updated_at` alone would invalidate on mutation; the individual
    /// fields are included so the binding survives even a write that
    /// does not go through the entity setters.
    fn mac_for(&self, user: &User, ts: i64) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(user.user_id.as_uuid().as_bytes());
        for field in [
            user.username.as_str(),
            user.email.as_str(),
            user.role.code(),
            if user.is_superuser { "1" } else { "0" },
            user.bio.as_str(),
            user.first_name.as_deref().unwrap_or_default(),
            user.last_name.as_deref().unwrap_or_default(),
        ] {
            mac.update(field.as_bytes());
            mac.update(&[0]);
        }
        mac.update(&user.updated_at.timestamp_millis().to_be_bytes());
        mac.update(&ts.to_be_bytes());
        mac
    }
}

impl std::fmt::Debug for ConfirmationCodeIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret stays out of debug output
        f.debug_struct("ConfirmationCodeIssuer")
            .field("ttl", &self.ttl)
            .finish()
    }
}

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: i64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36_ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

fn from_base36(s: &str) -> Option<i64> {
    if s.is_empty()
        || s.len() > 13
        || !s.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
    {
        return None;
    }
    i64::from_str_radix(s, 36).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{email::Email, username::Username};
    use chrono::Duration as ChronoDuration;

    const DAY: Duration = Duration::from_secs(24 * 3600);

    fn issuer() -> ConfirmationCodeIssuer {
        ConfirmationCodeIssuer::new([7u8; 32], DAY)
    }

    fn sample_user() -> User {
        User::new(
            Username::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
        )
    }

    #[test]
    fn test_issue_then_check() {
        let user = sample_user();
        let code = issuer().issue(&user);
        assert!(issuer().check(&user, &code));
    }

    #[test]
    fn test_code_is_reusable_within_window() {
        let user = sample_user();
        let code = issuer().issue(&user);
        assert!(issuer().check(&user, &code));
        assert!(issuer().check(&user, &code));
    }

    #[test]
    fn test_wrong_code_rejected() {
        let user = sample_user();
        assert!(!issuer().check(&user, "not-a-code"));
        assert!(!issuer().check(&user, ""));
        assert!(!issuer().check(&user, "zzzz"));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let user = sample_user();
        let code = issuer().issue(&user);
        let (ts, _) = code.split_once('-').unwrap();
        let forged = format!("{ts}-{}", URL_SAFE_NO_PAD.encode([0u8; SIG_BYTES]));
        assert!(!issuer().check(&user, &forged));
    }

    #[test]
    fn test_principal_mutation_invalidates() {
        let mut user = sample_user();
        let code = issuer().issue(&user);
        user.set_bio("now with a bio".to_string());
        assert!(!issuer().check(&user, &code));
    }

    #[test]
    fn test_role_change_invalidates() {
        let mut user = sample_user();
        let code = issuer().issue(&user);
        user.set_role(crate::domain::value_object::user_role::UserRole::Moderator);
        assert!(!issuer().check(&user, &code));
    }

    #[test]
    fn test_expired_code_rejected() {
        let user = sample_user();
        let two_days_ago = Utc::now() - ChronoDuration::days(2);
        let code = issuer().issue_at(&user, two_days_ago);
        assert!(!issuer().check(&user, &code));
    }

    #[test]
    fn test_future_code_rejected() {
        let user = sample_user();
        let tomorrow = Utc::now() + ChronoDuration::days(1);
        let code = issuer().issue_at(&user, tomorrow);
        assert!(!issuer().check(&user, &code));
    }

    #[test]
    fn test_different_secret_rejected() {
        let user = sample_user();
        let code = issuer().issue(&user);
        let other = ConfirmationCodeIssuer::new([8u8; 32], DAY);
        assert!(!other.check(&user, &code));
    }

    #[test]
    fn test_base36_roundtrip() {
        for n in [0i64, 1, 35, 36, 1234567890] {
            assert_eq!(from_base36(&to_base36(n)), Some(n));
        }
        assert_eq!(from_base36("ZZ"), None); // uppercase is not issued
        assert_eq!(from_base36("-1"), None);
        assert_eq!(from_base36(""), None);
    }
}
