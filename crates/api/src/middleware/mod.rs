//! Request extractors for the admin surface.

pub mod auth;
pub mod rbac;
