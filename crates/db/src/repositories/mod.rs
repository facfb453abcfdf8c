//! Repository layer.
//!
//! One cached repository per collection. Each holds the document store, its
//! own slot in the TTL cache and the remote call budgets; reads go through
//! the cache, writes go to the store first and then through to the cache.

pub mod content_repo;

pub use content_repo::{ContentRepo, SeedItem, SeedReport, SeedStatus};

use crate::models::{Artwork, Blog};

/// Cached repository over the `artworks` collection.
pub type ArtworkRepo = ContentRepo<Artwork>;

/// Cached repository over the `blogs` collection.
pub type BlogRepo = ContentRepo<Blog>;
