//! Sign Out Use Case
//!
//! Deletes the server-side session referenced by the cookie token.

use std::sync::Arc;

use crate::application::check_session::parse_session_token;
use crate::application::config::AccountsConfig;
use crate::domain::repository::SessionRepository;
use crate::error::AccountResult;

/// Sign out use case
pub struct SignOutUseCase<R>
where
    R: SessionRepository,
{
    session_repo: Arc<R>,
    config: Arc<AccountsConfig>,
}

impl<R> SignOutUseCase<R>
where
    R: SessionRepository,
{
    pub fn new(session_repo: Arc<R>, config: Arc<AccountsConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Delete the session if the token is valid
    ///
    /// An invalid or already-dead token is not an error: the client is
    /// signing out either way and gets its cookie cleared.
    pub async fn execute(&self, session_token: &str) -> AccountResult<()> {
        let Ok(session_id) = parse_session_token(session_token, &self.config.session_secret)
        else {
            return Ok(());
        };

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "Account signed out");

        Ok(())
    }
}
