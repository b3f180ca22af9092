//! Domain Layer

pub mod entity;
pub mod mailer;
pub mod repository;
pub mod value_object;
