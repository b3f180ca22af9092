//! Account Error Types
//!
//! This module provides account-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// Request body is missing email or password
    #[error("Missing email or password")]
    MissingCredentials,

    /// Email address already registered
    #[error("User already exists")]
    EmailTaken,

    /// No account for the given email
    #[error("No user found")]
    UserNotFound,

    /// Account exists but has no password credential
    #[error("No password set for this account")]
    NoPasswordSet,

    /// Email address has not been verified yet
    #[error("Email not verified")]
    EmailNotVerified,

    /// Password does not match the stored hash
    #[error("Incorrect password")]
    InvalidPassword,

    /// Verification token does not exist
    #[error("Invalid token")]
    InvalidToken,

    /// Verification token exists but has expired
    #[error("Token expired")]
    TokenExpired,

    /// Token resolved but its account no longer exists
    #[error("User not found")]
    AccountMissing,

    /// Session not found, expired, or signature mismatch
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Input validation error (email format, password policy)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::MissingCredentials
            | AccountError::InvalidToken
            | AccountError::TokenExpired
            | AccountError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountError::EmailTaken => StatusCode::CONFLICT,
            AccountError::UserNotFound
            | AccountError::NoPasswordSet
            | AccountError::EmailNotVerified
            | AccountError::InvalidPassword
            | AccountError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AccountError::AccountMissing => StatusCode::NOT_FOUND,
            AccountError::Database(_) | AccountError::Hashing(_) | AccountError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::MissingCredentials
            | AccountError::InvalidToken
            | AccountError::TokenExpired
            | AccountError::Validation(_) => ErrorKind::BadRequest,
            AccountError::EmailTaken => ErrorKind::Conflict,
            AccountError::UserNotFound
            | AccountError::NoPasswordSet
            | AccountError::EmailNotVerified
            | AccountError::InvalidPassword
            | AccountError::SessionInvalid => ErrorKind::Unauthorized,
            AccountError::AccountMissing => ErrorKind::NotFound,
            AccountError::Database(_) | AccountError::Hashing(_) | AccountError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AccountError::Hashing(msg) => {
                tracing::error!(message = %msg, "Password hashing error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::InvalidPassword | AccountError::EmailNotVerified => {
                tracing::warn!(error = %self, "Rejected sign-in attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AccountError {
    fn from(err: AppError) -> Self {
        AccountError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordPolicyError> for AccountError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AccountError::Validation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AccountError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AccountError::Hashing(err.to_string())
    }
}
