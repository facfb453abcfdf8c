//! Content sources behind the public and admin route trees.
//!
//! Both trees read through [`ContentSource`]. The public tree gets
//! [`SharedContent`], which derives every view from the data provider's
//! snapshot without touching the store. The admin tree gets
//! [`StandaloneContent`], which goes through the cached repositories.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use hearts_db::models::{Artwork, ArtworkFilter, Blog, BlogFilter, Record};
use hearts_db::repositories::ContentRepo;
use hearts_db::Catalog;
use serde::Serialize;

use crate::provider::DataProvider;

pub const NO_ARTWORKS_NOTICE: &str = "No artworks yet";
pub const NO_BLOGS_NOTICE: &str = "No blog posts yet";

/// What a page would render: the data plus its load and error state.
///
/// Serialized as-is, so `data` doubles as the response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentView<T> {
    pub data: T,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Empty-state message for a loaded list with nothing in it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl<T> ContentView<T> {
    /// Transform the data, keeping load and error state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ContentView<U> {
        ContentView {
            data: f(self.data),
            loading: self.loading,
            error: self.error,
            notice: self.notice,
        }
    }

    /// Whether the view is final: loaded without error.
    pub fn settled(&self) -> bool {
        !self.loading && self.error.is_none()
    }
}

impl<T> ContentView<Vec<T>> {
    fn list(data: Vec<T>, loading: bool, error: Option<String>, empty_notice: &str) -> Self {
        let notice =
            (!loading && error.is_none() && data.is_empty()).then(|| empty_notice.to_string());
        Self {
            data,
            loading,
            error,
            notice,
        }
    }
}

impl<T> ContentView<Option<T>> {
    fn item(data: Option<T>, loading: bool, error: Option<String>) -> Self {
        Self {
            data,
            loading,
            error,
            notice: None,
        }
    }
}

#[async_trait]
pub trait ContentSource: Debug + Send + Sync {
    async fn artworks(&self, filter: ArtworkFilter) -> ContentView<Vec<Artwork>>;

    async fn artwork_by_slug(&self, slug: &str) -> ContentView<Option<Artwork>>;

    async fn blogs(&self, filter: BlogFilter) -> ContentView<Vec<Blog>>;

    async fn blog_by_slug(&self, slug: &str) -> ContentView<Option<Blog>>;
}

// ---------------------------------------------------------------------------
// Shared (provider-backed)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SharedContent {
    provider: Arc<DataProvider>,
}

impl SharedContent {
    pub fn new(provider: Arc<DataProvider>) -> Self {
        Self { provider }
    }
}

fn filtered<R: Record>(list: &[R], filter: &R::Filter) -> Vec<R> {
    list.iter().filter(|r| r.matches(filter)).cloned().collect()
}

fn by_slug<R: Record>(list: &[R], slug: &str) -> Option<R> {
    list.iter().find(|r| r.slug() == slug).cloned()
}

#[async_trait]
impl ContentSource for SharedContent {
    async fn artworks(&self, filter: ArtworkFilter) -> ContentView<Vec<Artwork>> {
        let snapshot = self.provider.snapshot();
        let error = snapshot.error.map(|e| e.message);
        ContentView::list(
            filtered(&snapshot.artworks, &filter),
            !snapshot.artworks_state.is_loaded(),
            error,
            NO_ARTWORKS_NOTICE,
        )
    }

    async fn artwork_by_slug(&self, slug: &str) -> ContentView<Option<Artwork>> {
        let snapshot = self.provider.snapshot();
        ContentView::item(
            by_slug(&snapshot.artworks, slug),
            !snapshot.artworks_state.is_loaded(),
            snapshot.error.map(|e| e.message),
        )
    }

    async fn blogs(&self, filter: BlogFilter) -> ContentView<Vec<Blog>> {
        let snapshot = self.provider.snapshot();
        let error = snapshot.error.map(|e| e.message);
        ContentView::list(
            filtered(&snapshot.blogs, &filter),
            !snapshot.blogs_state.is_loaded(),
            error,
            NO_BLOGS_NOTICE,
        )
    }

    async fn blog_by_slug(&self, slug: &str) -> ContentView<Option<Blog>> {
        let snapshot = self.provider.snapshot();
        ContentView::item(
            by_slug(&snapshot.blogs, slug),
            !snapshot.blogs_state.is_loaded(),
            snapshot.error.map(|e| e.message),
        )
    }
}

// ---------------------------------------------------------------------------
// Standalone (repository-backed)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StandaloneContent {
    catalog: Catalog,
}

impl StandaloneContent {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

async fn fetch_list<R: Record>(
    repo: &ContentRepo<R>,
    filter: &R::Filter,
    notice: &str,
) -> ContentView<Vec<R>> {
    match repo.get(filter).await {
        Ok(list) => ContentView::list(list, false, None, notice),
        Err(e) => {
            tracing::error!(collection = R::COLLECTION, error = %e, "Content fetch failed");
            ContentView::list(Vec::new(), false, Some(e.to_string()), notice)
        }
    }
}

async fn fetch_one<R: Record>(repo: &ContentRepo<R>, slug: &str) -> ContentView<Option<R>> {
    match repo.get_by_slug(slug).await {
        Ok(found) => ContentView::item(found, false, None),
        Err(e) => {
            tracing::error!(collection = R::COLLECTION, slug, error = %e, "Content lookup failed");
            ContentView::item(None, false, Some(e.to_string()))
        }
    }
}

#[async_trait]
impl ContentSource for StandaloneContent {
    async fn artworks(&self, filter: ArtworkFilter) -> ContentView<Vec<Artwork>> {
        fetch_list(&self.catalog.artworks, &filter, NO_ARTWORKS_NOTICE).await
    }

    async fn artwork_by_slug(&self, slug: &str) -> ContentView<Option<Artwork>> {
        fetch_one(&self.catalog.artworks, slug).await
    }

    async fn blogs(&self, filter: BlogFilter) -> ContentView<Vec<Blog>> {
        fetch_list(&self.catalog.blogs, &filter, NO_BLOGS_NOTICE).await
    }

    async fn blog_by_slug(&self, slug: &str) -> ContentView<Option<Blog>> {
        fetch_one(&self.catalog.blogs, slug).await
    }
}

#[cfg(test)]
mod tests {
    use hearts_db::memory::{MemoryDocumentStore, MemoryObjectStore};
    use hearts_db::store::{DocumentData, COLLECTION_ARTWORKS};
    use hearts_db::CatalogConfig;
    use serde_json::json;

    use super::*;

    fn catalog(store: Arc<MemoryDocumentStore>) -> Catalog {
        Catalog::new(store, Arc::new(MemoryObjectStore::new()), CatalogConfig::default())
    }

    fn data(value: serde_json::Value) -> DocumentData {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn empty_loaded_list_reports_notice() {
        let store = Arc::new(MemoryDocumentStore::new());
        let content = StandaloneContent::new(catalog(store));

        let view = content.artworks(ArtworkFilter::default()).await;
        assert!(view.data.is_empty());
        assert!(!view.loading);
        assert_eq!(view.notice.as_deref(), Some(NO_ARTWORKS_NOTICE));

        let view = content.blogs(BlogFilter::default()).await;
        assert_eq!(view.notice.as_deref(), Some(NO_BLOGS_NOTICE));
    }

    #[tokio::test]
    async fn shared_view_is_loading_until_provider_fetches() {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .insert_raw(
                COLLECTION_ARTWORKS,
                "a1",
                data(json!({"title": "Nandi", "slug": "nandi", "medium": "Acrylic"})),
            )
            .await;
        let provider = Arc::new(DataProvider::new(catalog(store.clone())));
        let content = SharedContent::new(provider.clone());

        let view = content.artworks(ArtworkFilter::default()).await;
        assert!(view.loading);
        assert!(view.notice.is_none());

        provider.fetch_all().await;
        let reads = store.read_count();
        let view = content.artwork_by_slug("nandi").await;
        assert!(!view.loading);
        assert_eq!(view.data.unwrap().id, "a1");
        assert_eq!(store.read_count(), reads, "shared views never hit the store");
    }

    #[tokio::test]
    async fn standalone_failure_becomes_error_view() {
        let store = Arc::new(MemoryDocumentStore::new());
        store.set_offline(true);
        let content = StandaloneContent::new(catalog(store));

        let view = content.blogs(BlogFilter::published()).await;
        assert!(view.data.is_empty());
        assert!(view.error.is_some());
        assert!(view.notice.is_none());
    }
}
