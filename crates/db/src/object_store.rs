//! Object-store seam for uploaded images.
//!
//! Backends:
//! - [`crate::memory::MemoryObjectStore`] -- process-local, used by tests and dev mode
//! - [`crate::s3::S3ObjectStore`] -- any S3-compatible bucket

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::StoreResult;

/// Default bucket for uploaded images.
pub const DEFAULT_BUCKET: &str = "images";

/// Hosted object storage with public-read URLs.
#[async_trait]
pub trait ObjectStore: Debug + Send + Sync {
    /// Upload bytes to `path`, overwriting whatever is there.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<()>;

    /// Public URL for an object path.
    fn public_url(&self, path: &str) -> String;

    /// Recover the object path from a URL produced by [`ObjectStore::public_url`].
    fn path_from_public_url(&self, url: &str) -> Option<String>;

    /// Remove objects. Missing paths are ignored.
    async fn remove(&self, paths: &[String]) -> StoreResult<()>;
}

/// Public URL layout: `{base_url}/{bucket}/{path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrlScheme {
    base_url: String,
    bucket: String,
}

impl PublicUrlScheme {
    pub fn new(base_url: &str, bucket: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.trim_matches('/').to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, path.trim_start_matches('/'))
    }

    pub fn path_for(&self, url: &str) -> Option<String> {
        let prefix = format!("{}/{}/", self.base_url, self.bucket);
        url.strip_prefix(&prefix)
            .map(|rest| rest.split(['?', '#']).next().unwrap_or_default().to_string())
            .filter(|path| !path.is_empty())
    }
}
