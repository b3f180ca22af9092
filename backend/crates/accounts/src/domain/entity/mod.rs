//! Domain Entities

pub mod account;
pub mod session;
pub mod verification_token;

pub use account::Account;
pub use session::Session;
pub use verification_token::VerificationToken;
