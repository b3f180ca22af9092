//! Infrastructure Layer

pub mod mailer;
pub mod postgres;
