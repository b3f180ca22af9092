//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::verify_credentials::IdentityClaim;

// ============================================================================
// Register
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Registered account summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Registration response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegisteredUser,
}

// ============================================================================
// Email Verification
// ============================================================================

/// Query parameters for GET /verify-email
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

/// Verification response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailResponse {
    pub message: String,
}

// ============================================================================
// Login / Logout
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity of a signed-in account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

impl From<IdentityClaim> for IdentityResponse {
    fn from(claim: IdentityClaim) -> Self {
        Self {
            id: claim.id,
            name: claim.name,
            email: claim.email,
            image: claim.image,
        }
    }
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: IdentityResponse,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub user: Option<IdentityResponse>,
    pub expires_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Profile (for authenticated accounts)
// ============================================================================

/// Profile response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
