//! Password Hashing and Verification
//!
//! Password handling built on bcrypt with:
//! - Configurable cost factor (default 10)
//! - Zeroization of sensitive data
//! - Constant-time comparison (inside bcrypt's verify)
//!
//! ## Security Features
//! - Cleartext is zeroized on drop to limit memory inspection exposure
//! - Debug output is redacted
//! - Unicode input is NFKC-normalized before hashing so visually
//!   identical passwords verify regardless of input method

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in bytes (bcrypt silently truncates beyond 72)
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Default bcrypt cost factor
pub const DEFAULT_COST: u32 = 10;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} bytes (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// This type ensures that password data is securely erased from memory
/// when the value is dropped. It does not implement `Clone` to prevent
/// accidental copies, and its Debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// - Unicode is normalized using NFKC before validation
    /// - Minimum 8 characters (code points, not bytes)
    /// - Maximum 72 bytes (bcrypt truncation limit)
    /// - No control characters, not empty/whitespace only
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_BYTES,
                actual: normalized.len(),
            });
        }

        // Control characters (except space, tab) are almost certainly
        // paste accidents, not intentional password content
        for ch in normalized.chars() {
            if ch.is_control() && ch != ' ' && ch != '\t' {
                return Err(PasswordPolicyError::InvalidCharacter);
            }
        }

        Ok(Self(normalized))
    }

    /// Create without validation (for testing or trusted input)
    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    /// Get the password as a string slice for hashing
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Hash the password with bcrypt
    ///
    /// ## Arguments
    /// * `cost` - bcrypt cost factor (work factor); [`DEFAULT_COST`] is 10
    pub fn hash(&self, cost: u32) -> Result<HashedPassword, PasswordHashError> {
        let hash = bcrypt::hash(self.as_str(), cost)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword { hash })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in bcrypt's modular crypt format (`$2b$...`)
///
/// The encoded string carries the algorithm version, cost factor, salt
/// and digest, so verification needs no extra parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from an encoded hash string (e.g., from database)
    pub fn from_hash_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        // bcrypt encoded strings are "$2<rev>$<cost>$<salt+digest>"
        if !hash.starts_with("$2") || hash.split('$').count() != 4 {
            return Err(PasswordHashError::InvalidHashFormat);
        }

        Ok(Self { hash })
    }

    /// Get the encoded hash string for storage
    pub fn as_hash_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// bcrypt performs a constant-time comparison internally.
    /// Malformed hashes verify as `false` rather than erroring, so a
    /// corrupt row behaves like a wrong password.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        bcrypt::verify(password.as_str(), &self.hash).unwrap_or(false)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
