//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database and mail delivery implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Account registration with email + password
//! - Email verification via single-use expiring tokens
//! - Credential sign-in gated on verified email
//! - Server-side sessions with cookie-based tokens
//!
//! ## Security Model
//! - Passwords hashed with bcrypt
//! - Verification tokens are 32 bytes of CSPRNG output, single-use
//! - Session cookies carry an HMAC-SHA256 signature over the session id
//! - Unverified accounts cannot sign in

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use error::{AccountError, AccountResult};
pub use infra::mailer::{AppMailer, ResendMailer};
pub use infra::postgres::PgAccountRepository;
pub use presentation::router::accounts_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAccountRepository as AccountStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
