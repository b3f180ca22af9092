//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG, URL-safe Base64)
//! - Password hashing (bcrypt, cost-factor configurable)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
