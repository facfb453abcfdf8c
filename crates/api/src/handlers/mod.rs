pub mod admin_artworks;
pub mod admin_blogs;
pub mod admin_images;
pub mod admin_seed;
pub mod auth;
pub mod cache;
pub mod dashboard;
pub mod public;

use serde::Serialize;

/// Result of a bulk delete.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: usize,
}
