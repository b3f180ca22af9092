//! Email Verification Use Cases
//!
//! Issuing verification tokens and redeeming them.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::entity::VerificationToken;
use crate::domain::mailer::Mailer;
use crate::domain::repository::VerificationTokenRepository;
use crate::domain::value_object::Email;
use crate::error::AccountResult;

/// Number of random bytes in a verification token
const TOKEN_BYTES: usize = 32;

/// Issue verification token use case
///
/// Generates a fresh token, persists it, and sends the verification
/// mail. Mail delivery is best-effort: a failed send is logged but
/// does not fail the caller, the account can request another mail.
pub struct IssueVerificationUseCase<R, M>
where
    R: VerificationTokenRepository,
    M: Mailer,
{
    token_repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AccountsConfig>,
}

impl<R, M> IssueVerificationUseCase<R, M>
where
    R: VerificationTokenRepository,
    M: Mailer,
{
    pub fn new(token_repo: Arc<R>, mailer: Arc<M>, config: Arc<AccountsConfig>) -> Self {
        Self {
            token_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: &Email) -> AccountResult<VerificationToken> {
        let token_value = platform::crypto::to_base64_url(&platform::crypto::random_bytes(
            TOKEN_BYTES,
        ));

        let token = VerificationToken::new(
            email.clone(),
            token_value,
            self.config.verification_ttl(),
        );

        self.token_repo.create(&token).await?;

        let url = self.config.verification_url(&token.token);
        if let Err(e) = self
            .mailer
            .send_verification(email, &url, self.config.verification_ttl_hours)
            .await
        {
            tracing::warn!(error = %e, email = %email, "Failed to send verification email");
        } else {
            tracing::info!(email = %email, "Verification email sent");
        }

        Ok(token)
    }
}

/// Redeem verification token use case
///
/// The repository performs the whole redemption atomically; this use
/// case only adds logging.
pub struct RedeemVerificationUseCase<R>
where
    R: VerificationTokenRepository,
{
    token_repo: Arc<R>,
}

impl<R> RedeemVerificationUseCase<R>
where
    R: VerificationTokenRepository,
{
    pub fn new(token_repo: Arc<R>) -> Self {
        Self { token_repo }
    }

    pub async fn execute(&self, token: &str) -> AccountResult<Email> {
        let email = self.token_repo.redeem(token).await?;

        tracing::info!(email = %email, "Email verified");

        Ok(email)
    }
}
