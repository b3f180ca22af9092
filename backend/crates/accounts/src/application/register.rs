//! Registration Use Case
//!
//! Creates an unverified account and kicks off email verification.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AccountsConfig;
use crate::application::verification::IssueVerificationUseCase;
use crate::domain::entity::Account;
use crate::domain::mailer::Mailer;
use crate::domain::repository::{AccountRepository, VerificationTokenRepository};
use crate::domain::value_object::Email;
use crate::error::{AccountError, AccountResult};

/// Registration input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Registration use case
pub struct RegisterUseCase<R, M>
where
    R: AccountRepository + VerificationTokenRepository,
    M: Mailer,
{
    repo: Arc<R>,
    issue_verification: IssueVerificationUseCase<R, M>,
    config: Arc<AccountsConfig>,
}

impl<R, M> RegisterUseCase<R, M>
where
    R: AccountRepository + VerificationTokenRepository,
    M: Mailer,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AccountsConfig>) -> Self {
        Self {
            repo: repo.clone(),
            issue_verification: IssueVerificationUseCase::new(repo, mailer, config.clone()),
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AccountResult<Account> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AccountError::MissingCredentials);
        }

        let email =
            Email::new(&input.email).map_err(|e| AccountError::Validation(e.to_string()))?;

        if AccountRepository::exists_by_email(&*self.repo, &email).await? {
            return Err(AccountError::EmailTaken);
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = password.hash(self.config.bcrypt_cost)?;

        let account = Account::new(email.clone(), password_hash);
        // UFCS: `create` also exists on VerificationTokenRepository
        AccountRepository::create(&*self.repo, &account).await?;

        tracing::info!(account_id = %account.account_id, "Account registered");

        // Best-effort: the account row is already committed, so a failure
        // issuing the token or sending the mail must not turn the 201 into
        // an error. The client can request another verification mail.
        if let Err(e) = self.issue_verification.execute(&email).await {
            tracing::warn!(error = %e, email = %email, "Failed to issue verification token");
        }

        Ok(account)
    }
}
