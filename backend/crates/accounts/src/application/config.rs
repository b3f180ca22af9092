//! Application Configuration
//!
//! Configuration for the accounts application layer.

use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Accounts application configuration
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session TTL (30 days)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// bcrypt cost factor for new passwords
    pub bcrypt_cost: u32,
    /// Verification token lifetime in hours (24)
    pub verification_ttl_hours: i64,
    /// Public base URL used to build verification links
    pub base_url: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "account_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(30 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            bcrypt_cost: platform::password::DEFAULT_COST,
            verification_ttl_hours: 24,
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl AccountsConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        let bytes = platform::crypto::random_bytes(32);
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get session TTL in seconds
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl.as_secs() as i64
    }

    /// Get session TTL as a chrono duration
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs())
    }

    /// Get verification token lifetime as a chrono duration
    pub fn verification_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.verification_ttl_hours)
    }

    /// Build the verification link for a token
    pub fn verification_url(&self, token: &str) -> String {
        format!(
            "{}/verify-email?token={}",
            self.base_url.trim_end_matches('/'),
            token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_url() {
        let config = AccountsConfig {
            base_url: "https://app.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.verification_url("abc123"),
            "https://app.example.com/verify-email?token=abc123"
        );
    }

    #[test]
    fn test_random_secret_differs() {
        let a = AccountsConfig::with_random_secret();
        let b = AccountsConfig::with_random_secret();
        assert_ne!(a.session_secret, b.session_secret);
    }
}
