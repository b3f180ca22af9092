//! Check Session Use Case
//!
//! Verifies the session cookie token and retrieves session state.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::entity::{Account, Session};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::SessionId;
use crate::error::{AccountError, AccountResult};

/// Check session use case
pub struct CheckSessionUseCase<R>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<AccountsConfig>,
}

impl<R> CheckSessionUseCase<R>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountsConfig>) -> Self {
        Self { repo, config }
    }

    /// Check the token and return the session with its account
    pub async fn execute(&self, session_token: &str) -> AccountResult<(Session, Account)> {
        let session = self.get_session(session_token).await?;

        let account = AccountRepository::find_by_id(&*self.repo, &session.account_id)
            .await?
            .ok_or(AccountError::SessionInvalid)?;

        Ok((session, account))
    }

    /// Just check if a session token is valid (returns bool)
    pub async fn is_valid(&self, session_token: &str) -> bool {
        self.get_session(session_token).await.is_ok()
    }

    /// Verify the token signature and load the session
    pub async fn get_session(&self, session_token: &str) -> AccountResult<Session> {
        let session_id = parse_session_token(session_token, &self.config.session_secret)?;

        let session = SessionRepository::find_by_id(&*self.repo, session_id)
            .await?
            .ok_or(AccountError::SessionInvalid)?;

        if session.is_expired() {
            SessionRepository::delete(&*self.repo, session_id).await?;
            return Err(AccountError::SessionInvalid);
        }

        // Update last activity in the background (fire and forget)
        let repo = self.repo.clone();
        tokio::spawn(async move {
            if let Err(e) = SessionRepository::touch(&*repo, session_id).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(session)
    }
}

/// Parse and verify a session token
///
/// The HMAC check runs before any database access, so forged tokens
/// never touch the sessions table.
pub(crate) fn parse_session_token(token: &str, secret: &[u8; 32]) -> AccountResult<SessionId> {
    use base64::Engine;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let Some((session_id_str, signature_b64)) = token.split_once('.') else {
        return Err(AccountError::SessionInvalid);
    };

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AccountError::SessionInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| AccountError::SessionInvalid)?;

    session_id_str
        .parse::<uuid::Uuid>()
        .map(SessionId::from_uuid)
        .map_err(|_| AccountError::SessionInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_in::generate_session_token;
    use crate::domain::entity::Session;
    use crate::domain::value_object::AccountId;

    #[test]
    fn test_token_roundtrip() {
        let secret = [7u8; 32];
        let session = Session::new(AccountId::new(), chrono::Duration::days(30));

        let token = generate_session_token(&session, &secret);
        let parsed = parse_session_token(&token, &secret).unwrap();

        assert_eq!(parsed, session.session_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let session = Session::new(AccountId::new(), chrono::Duration::days(30));
        let token = generate_session_token(&session, &[7u8; 32]);

        assert!(parse_session_token(&token, &[8u8; 32]).is_err());
    }

    #[test]
    fn test_tampered_session_id_rejected() {
        let secret = [7u8; 32];
        let session = Session::new(AccountId::new(), chrono::Duration::days(30));
        let token = generate_session_token(&session, &secret);

        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", uuid::Uuid::new_v4(), signature);

        assert!(parse_session_token(&forged, &secret).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let secret = [7u8; 32];
        assert!(parse_session_token("", &secret).is_err());
        assert!(parse_session_token("no-dot-here", &secret).is_err());
        assert!(parse_session_token("a.b.c", &secret).is_err());
        assert!(parse_session_token("id.!!!not-base64!!!", &secret).is_err());
    }
}
