//! Verification Token Entity
//!
//! Single-use token proving ownership of an email address.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::Email;

/// Email verification token
///
/// `identifier` is the email address the token was issued for; the
/// token string itself is an opaque CSPRNG value. A token is consumed
/// (deleted) on first successful redemption.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    /// Email address this token verifies
    pub identifier: Email,
    /// Opaque token value (URL-safe Base64)
    pub token: String,
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Create a new token for an email address with the given lifetime
    pub fn new(identifier: Email, token: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            identifier,
            token,
            expires_at: now + ttl,
            created_at: now,
        }
    }

    /// Whether the token has passed its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
