//! Wiring for the whole data layer.
//!
//! A [`Catalog`] owns the per-collection caches and hands out repositories
//! sharing one document store. Build one per process (or per test).

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{TtlCache, DEFAULT_TTL};
use crate::images::ImageService;
use crate::object_store::ObjectStore;
use crate::repositories::{ArtworkRepo, BlogRepo};
use crate::store::DocumentStore;
use crate::timeout::Timeouts;

/// Tunables for [`Catalog::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    pub cache_ttl: Duration,
    pub timeouts: Timeouts,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            timeouts: Timeouts::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub artworks: ArtworkRepo,
    pub blogs: BlogRepo,
    pub images: ImageService,
}

impl Catalog {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            artworks: ArtworkRepo::new(
                Arc::clone(&documents),
                Arc::new(TtlCache::new(config.cache_ttl)),
                config.timeouts,
            ),
            blogs: BlogRepo::new(
                documents,
                Arc::new(TtlCache::new(config.cache_ttl)),
                config.timeouts,
            ),
            images: ImageService::new(objects, config.timeouts.write),
        }
    }

    /// Drop cached lists whose key starts with `prefix`, or all of them.
    pub fn invalidate_cache(&self, prefix: Option<&str>) {
        self.artworks.cache().invalidate(prefix);
        self.blogs.cache().invalidate(prefix);
        tracing::info!(prefix = prefix.unwrap_or("*"), "Cache invalidated");
    }
}
