//! Account Entity

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{AccountId, Email};

/// Account entity
///
/// The password hash is optional: accounts created through external
/// identity providers carry no local credential and cannot use
/// password sign-in.
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier
    pub account_id: AccountId,
    /// Email address (unique)
    pub email: Email,
    /// Optional display name
    pub display_name: Option<String>,
    /// Optional avatar image URL
    pub image: Option<String>,
    /// bcrypt hash, absent for provider-only accounts
    pub password_hash: Option<HashedPassword>,
    /// When the email address was verified, if ever
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new unverified account with a password credential
    pub fn new(email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            email,
            display_name: None,
            image: None,
            password_hash: Some(password_hash),
            email_verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the email address as verified
    pub fn verify_email(&mut self) {
        let now = Utc::now();
        self.email_verified_at = Some(now);
        self.updated_at = now;
    }

    /// Whether the email address has been verified
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Whether this account holds a local password credential
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn test_account() -> Account {
        let password = ClearTextPassword::new("pw123456".to_string()).unwrap();
        let hash = password.hash(4).unwrap();
        Account::new(Email::from_db("user@example.com"), hash)
    }

    #[test]
    fn test_new_account_is_unverified() {
        let account = test_account();
        assert!(!account.is_verified());
        assert!(account.has_password());
    }

    #[test]
    fn test_verify_email() {
        let mut account = test_account();
        account.verify_email();
        assert!(account.is_verified());
        assert!(account.email_verified_at.is_some());
    }
}
