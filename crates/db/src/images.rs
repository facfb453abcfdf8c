//! Image uploads into the public bucket.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hearts_core::error::CoreError;
use hearts_core::image_url::{object_path, VALID_FOLDERS};

use crate::error::{StoreError, StoreResult};
use crate::object_store::ObjectStore;
use crate::timeout::with_timeout;

/// Attempts made by [`ImageService::upload_image_with_retry`].
pub const MAX_UPLOAD_ATTEMPTS: u32 = 2;

/// Backoff before the first retry; doubles on each further retry.
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Uploads and deletes images, handing back public URLs.
#[derive(Debug, Clone)]
pub struct ImageService {
    objects: Arc<dyn ObjectStore>,
    upload_timeout: Duration,
}

impl ImageService {
    pub fn new(objects: Arc<dyn ObjectStore>, upload_timeout: Duration) -> Self {
        Self {
            objects,
            upload_timeout,
        }
    }

    /// Upload under `{folder}/{unix_millis}_{sanitized_name}` and return the
    /// public URL.
    pub async fn upload_image(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<String> {
        if !VALID_FOLDERS.contains(&folder) {
            return Err(CoreError::Validation(format!("Unknown image folder: {folder}")).into());
        }
        let path = object_path(folder, Utc::now().timestamp_millis(), file_name);

        with_timeout(
            "upload",
            self.upload_timeout,
            self.objects.upload(&path, bytes, content_type),
        )
        .await?;

        tracing::info!(path = %path, "Image uploaded");
        Ok(self.objects.public_url(&path))
    }

    /// [`Self::upload_image`] with up to [`MAX_UPLOAD_ATTEMPTS`] attempts and
    /// exponential backoff between them.
    pub async fn upload_image_with_retry(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<String> {
        let mut attempt = 0;
        loop {
            match self
                .upload_image(folder, file_name, bytes.clone(), content_type)
                .await
            {
                Ok(url) => return Ok(url),
                // Validation failures will not succeed on retry.
                Err(e) if attempt + 1 < MAX_UPLOAD_ATTEMPTS && !matches!(e, StoreError::Core(_)) => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Image upload failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Remove the object behind a public URL. Every failure is ignored,
    /// including URLs that do not point into the bucket.
    pub async fn delete_image(&self, url: &str) {
        let Some(path) = self.objects.path_from_public_url(url) else {
            tracing::debug!(url, "Not a bucket URL, nothing to delete");
            return;
        };
        if let Err(e) = self.objects.remove(&[path.clone()]).await {
            tracing::warn!(path = %path, error = %e, "Image delete failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::memory::MemoryObjectStore;

    #[tokio::test]
    async fn unknown_folders_are_rejected() {
        let service = ImageService::new(Arc::new(MemoryObjectStore::new()), Duration::from_secs(10));
        let result = service.upload_image("avatars", "a.png", vec![1], "image/png").await;
        assert_matches!(result, Err(StoreError::Core(CoreError::Validation(_))));
    }
}
