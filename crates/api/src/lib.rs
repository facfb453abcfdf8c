//! Hearts Creations API server library.
//!
//! Exposes the building blocks (config, state, data provider, content
//! sources, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod provider;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
