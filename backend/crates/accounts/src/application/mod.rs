//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod register;
pub mod sign_in;
pub mod sign_out;
pub mod verification;
pub mod verify_credentials;

// Re-exports
pub use check_session::CheckSessionUseCase;
pub use config::AccountsConfig;
pub use register::{RegisterInput, RegisterUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use verification::{IssueVerificationUseCase, RedeemVerificationUseCase};
pub use verify_credentials::{IdentityClaim, VerifyCredentialsUseCase};
