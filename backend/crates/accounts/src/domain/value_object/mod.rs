//! Value Objects

pub mod email;

pub use email::Email;
pub use kernel::id::{AccountId, SessionId};
