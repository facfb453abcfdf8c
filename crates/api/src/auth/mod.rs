//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token generation and validation.
//! - [`provider`] -- site session channel and admin credential check.

pub mod jwt;
pub mod password;
pub mod provider;

/// Role carried by admin access tokens.
pub const ROLE_ADMIN: &str = "admin";
