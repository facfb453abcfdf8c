//! Global data provider.
//!
//! Holds the artwork and blog lists shared by every public request. Each
//! collection moves `Uninitialized -> Loading -> Loaded` on its own. A fetch
//! failure sets a sticky error: the first one wins while it is outstanding,
//! and it clears once the collection that produced it loads successfully.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hearts_db::models::{Artwork, ArtworkFilter, Blog, BlogFilter};
use hearts_db::{Catalog, StoreError};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::auth::provider::AuthProvider;

/// Fetches fired by settled sessions after the initial direct fetch.
pub const MAX_AUTH_RETRIES: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Loaded,
}

impl LoadState {
    pub fn is_loaded(self) -> bool {
        self == LoadState::Loaded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Artworks,
    Blogs,
}

/// The outstanding fetch error and the collection that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderError {
    pub collection: Collection,
    pub message: String,
}

/// Point-in-time copy of the provider state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderSnapshot {
    pub artworks: Vec<Artwork>,
    pub blogs: Vec<Blog>,
    pub artworks_state: LoadState,
    pub blogs_state: LoadState,
    pub error: Option<ProviderError>,
}

#[derive(Debug)]
pub struct DataProvider {
    catalog: Catalog,
    state: RwLock<ProviderSnapshot>,
}

impl DataProvider {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: RwLock::new(ProviderSnapshot::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ProviderSnapshot> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProviderSnapshot> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> ProviderSnapshot {
        self.read().clone()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A failed fetch still settles the collection; its previous data stays.
    fn record_error(&self, collection: Collection, err: &StoreError) {
        tracing::error!(?collection, error = %err, "Provider fetch failed");
        let mut state = self.write();
        *Self::load_state(&mut state, collection) = LoadState::Loaded;
        if state.error.is_none() {
            state.error = Some(ProviderError {
                collection,
                message: err.to_string(),
            });
        }
    }

    fn clear_error_from(state: &mut ProviderSnapshot, collection: Collection) {
        if state.error.as_ref().is_some_and(|e| e.collection == collection) {
            state.error = None;
        }
    }

    pub fn set_artworks(&self, artworks: Vec<Artwork>) {
        let mut state = self.write();
        state.artworks = artworks;
        state.artworks_state = LoadState::Loaded;
        Self::clear_error_from(&mut state, Collection::Artworks);
    }

    pub fn set_blogs(&self, blogs: Vec<Blog>) {
        let mut state = self.write();
        state.blogs = blogs;
        state.blogs_state = LoadState::Loaded;
        Self::clear_error_from(&mut state, Collection::Blogs);
    }

    fn load_state(state: &mut ProviderSnapshot, collection: Collection) -> &mut LoadState {
        match collection {
            Collection::Artworks => &mut state.artworks_state,
            Collection::Blogs => &mut state.blogs_state,
        }
    }

    fn mark_loading(&self, collection: Collection) {
        let mut state = self.write();
        let slot = Self::load_state(&mut state, collection);
        if *slot == LoadState::Uninitialized {
            *slot = LoadState::Loading;
        }
    }

    /// Always goes to the store: a settled session may see documents the
    /// previous fetch could not.
    pub async fn refresh_artworks(&self) {
        self.mark_loading(Collection::Artworks);
        let all = ArtworkFilter::default();
        match self.catalog.artworks.get_from_server(&all).await {
            Ok(list) => {
                tracing::debug!(count = list.len(), "Provider loaded artworks");
                self.set_artworks(list);
            }
            Err(e) => self.record_error(Collection::Artworks, &e),
        }
    }

    pub async fn refresh_blogs(&self) {
        self.mark_loading(Collection::Blogs);
        let all = BlogFilter::default();
        match self.catalog.blogs.get_from_server(&all).await {
            Ok(list) => {
                tracing::debug!(count = list.len(), "Provider loaded blogs");
                self.set_blogs(list);
            }
            Err(e) => self.record_error(Collection::Blogs, &e),
        }
    }

    /// Fetch both collections concurrently.
    pub async fn fetch_all(&self) {
        tokio::join!(self.refresh_artworks(), self.refresh_blogs());
    }

    /// Re-read artworks after an admin write: from the write-through cache
    /// when it is live, else from the store.
    pub async fn sync_artworks(&self) {
        match self.catalog.artworks.cached() {
            Some(list) => self.set_artworks(list),
            None => self.refresh_artworks().await,
        }
    }

    pub async fn sync_blogs(&self) {
        match self.catalog.blogs.cached() {
            Some(list) => self.set_blogs(list),
            None => self.refresh_blogs().await,
        }
    }

    /// Edit one shared artwork in place. Returns `false` if it is not loaded.
    pub fn edit_artwork(&self, id: &str, edit: impl FnOnce(&mut Artwork)) -> bool {
        let mut state = self.write();
        match state.artworks.iter_mut().find(|a| a.id == id) {
            Some(artwork) => {
                edit(artwork);
                true
            }
            None => false,
        }
    }

    pub fn edit_blog(&self, id: &str, edit: impl FnOnce(&mut Blog)) -> bool {
        let mut state = self.write();
        match state.blogs.iter_mut().find(|b| b.id == id) {
            Some(blog) => {
                edit(blog);
                true
            }
            None => false,
        }
    }

    /// Start loading in the background.
    ///
    /// Fires a direct fetch straight away, then watches the auth provider's
    /// site session, signing in anonymously when there is none. Every
    /// settled session triggers another fetch, up to [`MAX_AUTH_RETRIES`].
    /// The direct fetch and the retries are not ordered against each other.
    pub fn mount(
        self: &Arc<Self>,
        auth: Arc<dyn AuthProvider>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let provider = Arc::clone(self);
        tokio::spawn(async move {
            let direct = tokio::spawn({
                let provider = Arc::clone(&provider);
                async move { provider.fetch_all().await }
            });

            let mut sessions = auth.subscribe();
            let mut settled = sessions.borrow_and_update().is_some();
            if !settled {
                if let Err(e) = auth.sign_in_anonymously().await {
                    tracing::warn!(error = %e, "Anonymous sign-in failed");
                }
            }

            let mut retries = 0;
            loop {
                if settled {
                    retries += 1;
                    tracing::debug!(retries, "Session settled, refetching");
                    provider.fetch_all().await;
                    if retries >= MAX_AUTH_RETRIES {
                        break;
                    }
                }
                tokio::select! {
                    () = cancel.cancelled() => break,
                    changed = sessions.changed() => match changed {
                        Ok(()) => settled = sessions.borrow_and_update().is_some(),
                        Err(_) => break,
                    },
                }
            }

            if cancel.is_cancelled() {
                direct.abort();
            }
            tracing::debug!("Provider mount finished");
        })
    }
}

#[cfg(test)]
mod tests {
    use hearts_db::memory::{MemoryDocumentStore, MemoryObjectStore};
    use hearts_db::store::{DocumentData, COLLECTION_ARTWORKS};
    use hearts_db::CatalogConfig;
    use serde_json::json;

    use super::*;

    fn provider(store: Arc<MemoryDocumentStore>) -> DataProvider {
        DataProvider::new(Catalog::new(
            store,
            Arc::new(MemoryObjectStore::new()),
            CatalogConfig::default(),
        ))
    }

    fn data(value: serde_json::Value) -> DocumentData {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn collections_load_independently() {
        let store = Arc::new(MemoryDocumentStore::new());
        let provider = provider(store);
        assert_eq!(provider.snapshot().artworks_state, LoadState::Uninitialized);

        provider.refresh_blogs().await;
        let snapshot = provider.snapshot();
        assert_eq!(snapshot.blogs_state, LoadState::Loaded);
        assert_eq!(snapshot.artworks_state, LoadState::Uninitialized);
    }

    #[tokio::test]
    async fn first_error_wins_until_its_collection_recovers() {
        let store = Arc::new(MemoryDocumentStore::new());
        let provider = provider(store.clone());
        store.set_offline(true);

        provider.refresh_artworks().await;
        provider.refresh_blogs().await;
        let snapshot = provider.snapshot();
        assert_eq!(snapshot.artworks_state, LoadState::Loaded);
        assert_eq!(snapshot.error.unwrap().collection, Collection::Artworks);

        store.set_offline(false);
        provider.refresh_blogs().await;
        let snapshot = provider.snapshot();
        assert!(snapshot.blogs_state.is_loaded());
        assert_eq!(
            snapshot.error.map(|e| e.collection),
            Some(Collection::Artworks),
            "a blog refresh does not clear an artwork error"
        );

        provider.refresh_artworks().await;
        assert!(provider.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn edits_touch_only_the_named_record() {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .insert_raw(
                COLLECTION_ARTWORKS,
                "a1",
                data(json!({"title": "Nandi", "slug": "nandi", "medium": "Acrylic"})),
            )
            .await;
        let provider = provider(store);
        provider.fetch_all().await;

        assert!(provider.edit_artwork("a1", |a| a.published = false));
        assert!(!provider.edit_artwork("missing", |a| a.published = false));
        assert!(!provider.snapshot().artworks[0].published);
    }
}
