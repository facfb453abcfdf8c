//! Image upload, retry and delete behaviour.

use std::sync::Arc;
use std::time::Duration;

use hearts_db::images::ImageService;
use hearts_db::memory::MemoryObjectStore;
use hearts_db::StoreError;

fn service(objects: &Arc<MemoryObjectStore>) -> ImageService {
    ImageService::new(objects.clone(), Duration::from_secs(10))
}

#[tokio::test]
async fn upload_returns_public_url_for_sanitized_path() {
    let objects = Arc::new(MemoryObjectStore::with_public_base("https://cdn.example.com/public"));
    let url = service(&objects)
        .upload_image("artworks", "nandi painting (1).png", vec![1, 2, 3], "image/png")
        .await
        .unwrap();

    let prefix = "https://cdn.example.com/public/images/artworks/";
    assert!(url.starts_with(prefix), "{url}");
    let path = url.trim_start_matches("https://cdn.example.com/public/images/");
    assert!(path.ends_with("_nandi_painting__1_.png"), "{path}");

    let stored = objects.get(path).await.unwrap();
    assert_eq!(stored.bytes, vec![1, 2, 3]);
    assert_eq!(stored.content_type, "image/png");
}

#[tokio::test(start_paused = true)]
async fn retry_recovers_from_one_failure_after_backoff() {
    let objects = Arc::new(MemoryObjectStore::new());
    objects.fail_next(1);

    let started = tokio::time::Instant::now();
    let url = service(&objects)
        .upload_image_with_retry("blogs", "cover.jpg", vec![9], "image/jpeg")
        .await;

    assert!(url.is_ok());
    assert_eq!(objects.upload_attempts(), 2);
    assert!(started.elapsed() >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn retry_gives_up_after_two_attempts() {
    let objects = Arc::new(MemoryObjectStore::new());
    objects.fail_next(5);

    let result = service(&objects)
        .upload_image_with_retry("blogs", "cover.jpg", vec![9], "image/jpeg")
        .await;

    assert!(matches!(result, Err(StoreError::Rejected(_))));
    assert_eq!(objects.upload_attempts(), 2);
    assert_eq!(objects.len().await, 0);
}

#[tokio::test]
async fn delete_ignores_failures_and_foreign_urls() {
    let objects = Arc::new(MemoryObjectStore::new());
    let images = service(&objects);
    let url = images
        .upload_image("artworks", "a.png", vec![1], "image/png")
        .await
        .unwrap();

    images.delete_image("https://lh3.googleusercontent.com/d/abc").await;
    assert_eq!(objects.len().await, 1);

    objects.fail_next(1);
    images.delete_image(&url).await;
    assert_eq!(objects.len().await, 1);

    images.delete_image(&url).await;
    assert_eq!(objects.len().await, 0);
}
