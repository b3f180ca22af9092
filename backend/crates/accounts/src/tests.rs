//! Unit tests for the accounts crate
//!
//! Use cases are exercised against in-memory fakes; the PostgreSQL
//! repository is covered by integration tests against a real database.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use crate::application::config::AccountsConfig;
use crate::application::{
    CheckSessionUseCase, RegisterInput, RegisterUseCase, SignInInput, SignInUseCase,
    SignOutUseCase,
};
use crate::domain::entity::{Account, Session, VerificationToken};
use crate::domain::mailer::Mailer;
use crate::domain::repository::{
    AccountRepository, SessionRepository, VerificationTokenRepository,
};
use crate::domain::value_object::{AccountId, Email, SessionId};
use crate::error::{AccountError, AccountResult};
use uuid::Uuid;

// ============================================================================
// In-memory fakes
// ============================================================================

#[derive(Clone, Default)]
struct MemoryRepository {
    accounts: Arc<Mutex<Vec<Account>>>,
    tokens: Arc<Mutex<Vec<VerificationToken>>>,
    sessions: Arc<Mutex<Vec<Session>>>,
}

impl AccountRepository for MemoryRepository {
    async fn create(&self, account: &Account) -> AccountResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AccountError::EmailTaken);
        }
        accounts.push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|a| a.account_id == *account_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.email == *email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().any(|a| a.email == *email))
    }
}

impl VerificationTokenRepository for MemoryRepository {
    async fn create(&self, token: &VerificationToken) -> AccountResult<()> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn redeem(&self, token: &str) -> AccountResult<Email> {
        let stored = {
            let tokens = self.tokens.lock().unwrap();
            tokens.iter().find(|t| t.token == token).cloned()
        };

        let Some(stored) = stored else {
            return Err(AccountError::InvalidToken);
        };

        if stored.is_expired() {
            self.tokens.lock().unwrap().retain(|t| t.token != token);
            return Err(AccountError::TokenExpired);
        }

        let mut accounts = self.accounts.lock().unwrap();
        let Some(account) = accounts.iter_mut().find(|a| a.email == stored.identifier) else {
            return Err(AccountError::AccountMissing);
        };
        account.verify_email();
        drop(accounts);

        self.tokens.lock().unwrap().retain(|t| t.token != token);

        Ok(stored.identifier)
    }
}

impl SessionRepository for MemoryRepository {
    async fn create(&self, session: &Session) -> AccountResult<()> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: SessionId) -> AccountResult<Option<Session>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .iter()
            .find(|s| s.session_id == session_id && !s.is_expired())
            .cloned())
    }

    async fn touch(&self, session_id: SessionId) -> AccountResult<()> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.iter_mut().find(|s| s.session_id == session_id) {
            session.touch();
        }
        Ok(())
    }

    async fn delete(&self, session_id: SessionId) -> AccountResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|s| s.session_id != session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AccountResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| !s.is_expired());
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl Mailer for RecordingMailer {
    async fn send_verification(
        &self,
        to: &Email,
        verification_url: &str,
        _ttl_hours: i64,
    ) -> AccountResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.as_str().to_string(), verification_url.to_string()));
        Ok(())
    }
}

/// Mailer whose delivery always fails
#[derive(Clone, Default)]
struct FailingMailer;

impl Mailer for FailingMailer {
    async fn send_verification(
        &self,
        _to: &Email,
        _verification_url: &str,
        _ttl_hours: i64,
    ) -> AccountResult<()> {
        Err(AccountError::Internal("mail provider unreachable".to_string()))
    }
}

/// Memory repository whose token store always fails on insert
#[derive(Clone, Default)]
struct BrokenTokenStore {
    inner: MemoryRepository,
}

impl AccountRepository for BrokenTokenStore {
    async fn create(&self, account: &Account) -> AccountResult<()> {
        AccountRepository::create(&self.inner, account).await
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        AccountRepository::find_by_id(&self.inner, account_id).await
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        AccountRepository::find_by_email(&self.inner, email).await
    }

    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool> {
        AccountRepository::exists_by_email(&self.inner, email).await
    }
}

impl VerificationTokenRepository for BrokenTokenStore {
    async fn create(&self, _token: &VerificationToken) -> AccountResult<()> {
        Err(AccountError::Database(sqlx::Error::PoolClosed))
    }

    async fn redeem(&self, token: &str) -> AccountResult<Email> {
        self.inner.redeem(token).await
    }
}

// ============================================================================
// Test helpers
// ============================================================================

fn test_config() -> Arc<AccountsConfig> {
    Arc::new(AccountsConfig {
        bcrypt_cost: 4,
        ..AccountsConfig::development()
    })
}

struct TestEnv {
    repo: Arc<MemoryRepository>,
    mailer: Arc<RecordingMailer>,
    config: Arc<AccountsConfig>,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            repo: Arc::new(MemoryRepository::default()),
            mailer: Arc::new(RecordingMailer::default()),
            config: test_config(),
        }
    }

    async fn register(&self, email: &str, password: &str) -> AccountResult<Account> {
        let use_case = RegisterUseCase::new(
            self.repo.clone(),
            self.mailer.clone(),
            self.config.clone(),
        );
        use_case
            .execute(RegisterInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn login(&self, email: &str, password: &str) -> AccountResult<String> {
        let use_case = SignInUseCase::new(self.repo.clone(), self.config.clone());
        let output = use_case
            .execute(SignInInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(output.session_token)
    }

    /// The single issued token for an email, straight from storage
    fn stored_token(&self, email: &str) -> Option<String> {
        self.repo
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.identifier.as_str() == email)
            .map(|t| t.token.clone())
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_creates_unverified_account() {
    let env = TestEnv::new();

    let account = env.register("user@example.com", "pw123456").await.unwrap();

    assert!(!account.is_verified());
    assert!(account.has_password());
    assert_eq!(account.email.as_str(), "user@example.com");
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let env = TestEnv::new();

    env.register("user@example.com", "pw123456").await.unwrap();
    let err = env
        .register("user@example.com", "different1")
        .await
        .unwrap_err();

    assert!(matches!(err, AccountError::EmailTaken));
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let env = TestEnv::new();

    let err = env.register("", "pw123456").await.unwrap_err();
    assert!(matches!(err, AccountError::MissingCredentials));

    let err = env.register("user@example.com", "").await.unwrap_err();
    assert!(matches!(err, AccountError::MissingCredentials));
}

#[tokio::test]
async fn register_rejects_weak_password() {
    let env = TestEnv::new();

    let err = env.register("user@example.com", "short").await.unwrap_err();
    assert!(matches!(err, AccountError::Validation(_)));
}

#[tokio::test]
async fn register_sends_verification_mail_with_token_link() {
    let env = TestEnv::new();

    env.register("user@example.com", "pw123456").await.unwrap();

    let token = env.stored_token("user@example.com").expect("token stored");

    let sent = env.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "user@example.com");
    assert!(sent[0].1.contains(&token));
    assert!(sent[0].1.contains("/verify-email?token="));
}

#[tokio::test]
async fn register_succeeds_when_mail_send_fails() {
    let repo = Arc::new(MemoryRepository::default());
    let use_case = RegisterUseCase::new(repo.clone(), Arc::new(FailingMailer), test_config());

    let account = use_case
        .execute(RegisterInput {
            email: "user@example.com".to_string(),
            password: "pw123456".to_string(),
        })
        .await
        .unwrap();

    assert!(!account.is_verified());
    // The token was persisted even though the mail never left
    assert_eq!(repo.tokens.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn register_succeeds_when_token_store_fails() {
    let repo = Arc::new(BrokenTokenStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let use_case = RegisterUseCase::new(repo.clone(), mailer.clone(), test_config());

    let account = use_case
        .execute(RegisterInput {
            email: "user@example.com".to_string(),
            password: "pw123456".to_string(),
        })
        .await
        .unwrap();

    // The account row landed; no token was stored, no mail went out
    let stored = AccountRepository::find_by_id(&*repo, &account.account_id)
        .await
        .unwrap();
    assert!(stored.is_some());
    assert!(repo.inner.tokens.lock().unwrap().is_empty());
    assert!(mailer.sent.lock().unwrap().is_empty());
}

// ============================================================================
// Email verification
// ============================================================================

#[tokio::test]
async fn redeem_marks_account_verified_and_consumes_token() {
    let env = TestEnv::new();

    env.register("user@example.com", "pw123456").await.unwrap();
    let token = env.stored_token("user@example.com").unwrap();

    let email = env.repo.redeem(&token).await.unwrap();
    assert_eq!(email.as_str(), "user@example.com");

    let email = Email::from_db("user@example.com");
    let account = AccountRepository::find_by_email(&*env.repo, &email)
        .await
        .unwrap()
        .unwrap();
    assert!(account.is_verified());

    // Single-use: second redemption sees no row
    let err = env.repo.redeem(&token).await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidToken));
}

#[tokio::test]
async fn redeem_unknown_token_is_invalid() {
    let env = TestEnv::new();

    let err = env.repo.redeem("no-such-token").await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidToken));
}

#[tokio::test]
async fn redeem_expired_token_is_rejected_and_removed() {
    let env = TestEnv::new();

    env.register("user@example.com", "pw123456").await.unwrap();

    {
        let mut tokens = env.repo.tokens.lock().unwrap();
        tokens[0].expires_at = Utc::now() - Duration::seconds(1);
    }
    let token = env.stored_token("user@example.com").unwrap();

    let err = env.repo.redeem(&token).await.unwrap_err();
    assert!(matches!(err, AccountError::TokenExpired));

    // Stale row is gone; retry reports invalid, not expired
    let err = env.repo.redeem(&token).await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidToken));
}

#[tokio::test]
async fn redeem_token_without_account_reports_missing() {
    let env = TestEnv::new();

    let orphan = VerificationToken::new(
        Email::from_db("ghost@example.com"),
        "orphan-token".to_string(),
        Duration::hours(24),
    );
    VerificationTokenRepository::create(&*env.repo, &orphan)
        .await
        .unwrap();

    let err = env.repo.redeem("orphan-token").await.unwrap_err();
    assert!(matches!(err, AccountError::AccountMissing));
}

// ============================================================================
// Sign in
// ============================================================================

#[tokio::test]
async fn login_unknown_email_is_rejected() {
    let env = TestEnv::new();

    let err = env
        .login("nobody@example.com", "pw123456")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

#[tokio::test]
async fn login_unverified_account_is_rejected() {
    let env = TestEnv::new();

    env.register("user@example.com", "pw123456").await.unwrap();
    let err = env.login("user@example.com", "pw123456").await.unwrap_err();

    assert!(matches!(err, AccountError::EmailNotVerified));
}

#[tokio::test]
async fn login_wrong_password_is_rejected() {
    let env = TestEnv::new();

    env.register("user@example.com", "pw123456").await.unwrap();
    let token = env.stored_token("user@example.com").unwrap();
    env.repo.redeem(&token).await.unwrap();

    let err = env
        .login("user@example.com", "wrongpass1")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::InvalidPassword));
}

#[tokio::test]
async fn login_account_without_password_is_rejected() {
    let env = TestEnv::new();

    // Provider-only account: verified but no local credential
    let password = platform::password::ClearTextPassword::new("pw123456".to_string()).unwrap();
    let mut account = Account::new(Email::from_db("oauth@example.com"), password.hash(4).unwrap());
    account.password_hash = None;
    account.verify_email();
    AccountRepository::create(&*env.repo, &account).await.unwrap();

    let err = env
        .login("oauth@example.com", "pw123456")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::NoPasswordSet));
}

#[tokio::test]
async fn login_missing_credentials_is_rejected() {
    let env = TestEnv::new();

    let err = env.login("", "pw123456").await.unwrap_err();
    assert!(matches!(err, AccountError::MissingCredentials));

    let err = env.login("user@example.com", "").await.unwrap_err();
    assert!(matches!(err, AccountError::MissingCredentials));
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn full_lifecycle_register_verify_login_logout() {
    let env = TestEnv::new();

    env.register("user@example.com", "pw123456").await.unwrap();

    // Sign-in is blocked until the email is verified
    let err = env.login("user@example.com", "pw123456").await.unwrap_err();
    assert!(matches!(err, AccountError::EmailNotVerified));

    let token = env.stored_token("user@example.com").unwrap();
    env.repo.redeem(&token).await.unwrap();

    let session_token = env.login("user@example.com", "pw123456").await.unwrap();

    let check = CheckSessionUseCase::new(env.repo.clone(), env.config.clone());
    let (session, account) = check.execute(&session_token).await.unwrap();
    assert_eq!(account.email.as_str(), "user@example.com");
    assert_eq!(session.account_id, account.account_id);

    let sign_out = SignOutUseCase::new(env.repo.clone(), env.config.clone());
    sign_out.execute(&session_token).await.unwrap();

    assert!(!check.is_valid(&session_token).await);
}

#[tokio::test]
async fn expired_session_is_deleted_on_check() {
    let env = TestEnv::new();

    env.register("user@example.com", "pw123456").await.unwrap();
    let token = env.stored_token("user@example.com").unwrap();
    env.repo.redeem(&token).await.unwrap();

    let session_token = env.login("user@example.com", "pw123456").await.unwrap();

    {
        let mut sessions = env.repo.sessions.lock().unwrap();
        sessions[0].expires_at = Utc::now() - Duration::seconds(1);
    }

    let check = CheckSessionUseCase::new(env.repo.clone(), env.config.clone());
    assert!(!check.is_valid(&session_token).await);
}

#[tokio::test]
async fn forged_session_token_is_rejected() {
    let env = TestEnv::new();

    env.register("user@example.com", "pw123456").await.unwrap();
    let token = env.stored_token("user@example.com").unwrap();
    env.repo.redeem(&token).await.unwrap();

    let session_token = env.login("user@example.com", "pw123456").await.unwrap();

    // Swap the session id, keep the signature
    let (_, signature) = session_token.split_once('.').unwrap();
    let forged = format!("{}.{}", Uuid::new_v4(), signature);

    let check = CheckSessionUseCase::new(env.repo.clone(), env.config.clone());
    assert!(!check.is_valid(&forged).await);
    assert!(check.is_valid(&session_token).await);
}

#[tokio::test]
async fn cleanup_expired_removes_only_stale_sessions() {
    let env = TestEnv::new();

    let live = Session::new(AccountId::new(), Duration::days(30));
    let mut stale = Session::new(AccountId::new(), Duration::days(30));
    stale.expires_at = Utc::now() - Duration::seconds(1);

    SessionRepository::create(&*env.repo, &live).await.unwrap();
    SessionRepository::create(&*env.repo, &stale).await.unwrap();

    let deleted = env.repo.cleanup_expired().await.unwrap();
    assert_eq!(deleted, 1);

    assert!(
        SessionRepository::find_by_id(&*env.repo, live.session_id)
            .await
            .unwrap()
            .is_some()
    );
}
