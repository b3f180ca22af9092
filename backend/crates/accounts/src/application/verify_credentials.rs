//! Credential Verification Use Case
//!
//! Checks an email/password pair against stored state and reports the
//! exact reason for failure. Callers decide how much of that detail
//! reaches the client.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::Email;
use crate::error::{AccountError, AccountResult};

/// Identity established by successful credential verification
#[derive(Debug, Clone)]
pub struct IdentityClaim {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

impl From<&Account> for IdentityClaim {
    fn from(account: &Account) -> Self {
        Self {
            id: account.account_id.to_string(),
            name: account.display_name.clone(),
            email: account.email.as_str().to_string(),
            image: account.image.clone(),
        }
    }
}

/// Credential verification use case
pub struct VerifyCredentialsUseCase<R>
where
    R: AccountRepository,
{
    account_repo: Arc<R>,
}

impl<R> VerifyCredentialsUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(account_repo: Arc<R>) -> Self {
        Self { account_repo }
    }

    /// Verify credentials and return the account on success
    ///
    /// Checks run in a fixed order so each failure mode maps to one
    /// distinct error: missing input, unknown email, provider-only
    /// account, unverified email, wrong password.
    pub async fn execute(&self, email: &str, password: &str) -> AccountResult<Account> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AccountError::MissingCredentials);
        }

        let email = Email::new(email).map_err(|_| AccountError::UserNotFound)?;

        let account = self
            .account_repo
            .find_by_email(&email)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let Some(hash) = &account.password_hash else {
            return Err(AccountError::NoPasswordSet);
        };

        if !account.is_verified() {
            return Err(AccountError::EmailNotVerified);
        }

        let password = ClearTextPassword::new(password.to_string())
            .map_err(|_| AccountError::InvalidPassword)?;

        if !hash.verify(&password) {
            return Err(AccountError::InvalidPassword);
        }

        Ok(account)
    }
}
