//! Mailer Port
//!
//! Interface for outbound verification mail. Implementation is in
//! infrastructure layer.

use crate::domain::value_object::Email;
use crate::error::AccountResult;

/// Outbound mail delivery trait
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Send a verification email containing the given link
    ///
    /// `ttl_hours` is included in the message so the recipient knows
    /// how long the link stays valid.
    async fn send_verification(
        &self,
        to: &Email,
        verification_url: &str,
        ttl_hours: i64,
    ) -> AccountResult<()>;
}
