//! Sign In Use Case
//!
//! Verifies credentials and creates a server-side session.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::verify_credentials::{IdentityClaim, VerifyCredentialsUseCase};
use crate::domain::entity::Session;
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::error::AccountResult;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    /// Session token for cookie
    pub session_token: String,
    /// Identity of the signed-in account
    pub identity: IdentityClaim,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: AccountRepository + SessionRepository,
{
    repo: Arc<R>,
    verify_credentials: VerifyCredentialsUseCase<R>,
    config: Arc<AccountsConfig>,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository + SessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountsConfig>) -> Self {
        Self {
            repo: repo.clone(),
            verify_credentials: VerifyCredentialsUseCase::new(repo),
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AccountResult<SignInOutput> {
        let account = self
            .verify_credentials
            .execute(&input.email, &input.password)
            .await?;

        let session = Session::new(account.account_id, self.config.session_ttl_chrono());
        SessionRepository::create(&*self.repo, &session).await?;

        let session_token = generate_session_token(&session, &self.config.session_secret);

        tracing::info!(
            account_id = %account.account_id,
            session_id = %session.session_id,
            "Account signed in"
        );

        Ok(SignInOutput {
            session_token,
            identity: IdentityClaim::from(&account),
        })
    }
}

/// Generate signed session token
///
/// Format: `{session_id}.{base64url(HMAC-SHA256(secret, session_id))}`
pub(crate) fn generate_session_token(session: &Session, secret: &[u8; 32]) -> String {
    use base64::Engine;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let session_id = session.session_id.to_string();

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!(
        "{}.{}",
        session_id,
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}
