//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Account, Session, VerificationToken};
use crate::domain::repository::{
    AccountRepository, SessionRepository, VerificationTokenRepository,
};
use crate::domain::value_object::{AccountId, Email, SessionId};
use crate::error::{AccountError, AccountResult};
use platform::password::HashedPassword;

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired_sessions(&self) -> AccountResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &Account) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                email,
                display_name,
                image,
                password_hash,
                email_verified_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(&account.display_name)
        .bind(&account.image)
        .bind(account.password_hash.as_ref().map(|h| h.as_hash_string()))
        .bind(account.email_verified_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AccountError::EmailTaken,
            _ => AccountError::Database(e),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                email,
                display_name,
                image,
                password_hash,
                email_verified_at,
                created_at,
                updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                email,
                display_name,
                image,
                password_hash,
                email_verified_at,
                created_at,
                updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Verification Token Repository Implementation
// ============================================================================

impl VerificationTokenRepository for PgAccountRepository {
    async fn create(&self, token: &VerificationToken) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO verification_tokens (
                identifier,
                token,
                expires_at,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(token.identifier.as_str())
        .bind(&token.token)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn redeem(&self, token: &str) -> AccountResult<Email> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent redemptions of the same token;
        // the loser sees no row after the winner's delete commits
        let row = sqlx::query_as::<_, VerificationTokenRow>(
            r#"
            SELECT identifier, token, expires_at, created_at
            FROM verification_tokens
            WHERE token = $1
            FOR UPDATE
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(AccountError::InvalidToken);
        };

        let stored = row.into_token();

        if stored.is_expired() {
            // Stale rows are garbage; remove on sight
            sqlx::query("DELETE FROM verification_tokens WHERE token = $1")
                .bind(token)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            return Err(AccountError::TokenExpired);
        }

        let updated = sqlx::query(
            r#"
            UPDATE accounts
            SET email_verified_at = $2, updated_at = $2
            WHERE email = $1
            "#,
        )
        .bind(stored.identifier.as_str())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Err(AccountError::AccountMissing);
        }

        sqlx::query("DELETE FROM verification_tokens WHERE token = $1")
            .bind(token)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(stored.identifier)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAccountRepository {
    async fn create(&self, session: &Session) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                account_id,
                expires_at,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.account_id.as_uuid())
        .bind(session.expires_at)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: SessionId) -> AccountResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                account_id,
                expires_at,
                created_at,
                last_activity_at
            FROM sessions
            WHERE session_id = $1 AND expires_at > $2
            "#,
        )
        .bind(session_id.into_uuid())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_session()))
    }

    async fn touch(&self, session_id: SessionId) -> AccountResult<()> {
        sqlx::query("UPDATE sessions SET last_activity_at = $2 WHERE session_id = $1")
            .bind(session_id.into_uuid())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, session_id: SessionId) -> AccountResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id.into_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AccountResult<u64> {
        self.cleanup_expired_sessions().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    display_name: Option<String>,
    image: Option<String>,
    password_hash: Option<String>,
    email_verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AccountResult<Account> {
        let password_hash = self
            .password_hash
            .map(HashedPassword::from_hash_string)
            .transpose()
            .map_err(|e| AccountError::Internal(format!("Corrupt password hash: {}", e)))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email: Email::from_db(self.email),
            display_name: self.display_name,
            image: self.image,
            password_hash,
            email_verified_at: self.email_verified_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VerificationTokenRow {
    identifier: String,
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl VerificationTokenRow {
    fn into_token(self) -> VerificationToken {
        VerificationToken {
            identifier: Email::from_db(self.identifier),
            token: self.token,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    account_id: Uuid,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: SessionId::from_uuid(self.session_id),
            account_id: AccountId::from_uuid(self.account_id),
            expires_at: self.expires_at,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        }
    }
}
