//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{Account, Session, VerificationToken};
use crate::domain::value_object::{AccountId, Email, SessionId};
use crate::error::AccountResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create a new account
    async fn create(&self, account: &Account) -> AccountResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>>;

    /// Find account by email (exact match)
    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool>;
}

/// Verification token repository trait
#[trait_variant::make(VerificationTokenRepository: Send)]
pub trait LocalVerificationTokenRepository {
    /// Persist a freshly issued token
    async fn create(&self, token: &VerificationToken) -> AccountResult<()>;

    /// Redeem a token: atomically validate it, mark the owning account
    /// verified, and consume the token so it cannot be used again.
    ///
    /// Returns the verified email on success.
    ///
    /// ## Errors
    /// - [`AccountError::InvalidToken`] if no such token exists
    ///   (including tokens already redeemed)
    /// - [`AccountError::TokenExpired`] if the token exists but has
    ///   expired; the stale row is removed
    /// - [`AccountError::AccountMissing`] if no account matches the
    ///   token's email
    ///
    /// [`AccountError::InvalidToken`]: crate::error::AccountError::InvalidToken
    /// [`AccountError::TokenExpired`]: crate::error::AccountError::TokenExpired
    /// [`AccountError::AccountMissing`]: crate::error::AccountError::AccountMissing
    async fn redeem(&self, token: &str) -> AccountResult<Email>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> AccountResult<()>;

    /// Find session by ID
    ///
    /// Expired sessions are deleted on sight and reported as absent.
    async fn find_by_id(&self, session_id: SessionId) -> AccountResult<Option<Session>>;

    /// Update a session's last activity timestamp
    async fn touch(&self, session_id: SessionId) -> AccountResult<()>;

    /// Delete a session
    async fn delete(&self, session_id: SessionId) -> AccountResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AccountResult<u64>;
}
