//! Cached CRUD over one document collection.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use hearts_core::types::DocId;
use serde::Serialize;
use serde_json::Value;

use crate::cache::TtlCache;
use crate::error::StoreResult;
use crate::models::{decode, encode, encode_patch, Record};
use crate::store::{Document, DocumentData, DocumentStore, WriteBatch};
use crate::timeout::{with_timeout, Timeouts};
use crate::write_through::{
    cache_clear, cache_extend, cache_insert, cache_patch, cache_patch_many, cache_remove,
};

/// Outcome of seeding one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedStatus {
    /// Not in the store yet (status checks only).
    Pending,
    /// Already present and left alone.
    Exists,
    /// Created by this run.
    Seeded,
    /// Already present and overwritten by this run.
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedItem {
    pub slug: String,
    pub status: SeedStatus,
}

/// Per-item result of a seed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub items: Vec<SeedItem>,
}

impl SeedReport {
    pub fn count(&self, status: SeedStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }
}

/// Cached repository for records of type `R`.
#[derive(Debug)]
pub struct ContentRepo<R: Record> {
    store: Arc<dyn DocumentStore>,
    cache: Arc<TtlCache<Vec<R>>>,
    timeouts: Timeouts,
}

impl<R: Record> Clone for ContentRepo<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            timeouts: self.timeouts,
        }
    }
}

impl<R: Record> ContentRepo<R> {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<TtlCache<Vec<R>>>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            store,
            cache,
            timeouts,
        }
    }

    pub fn cache(&self) -> &TtlCache<Vec<R>> {
        &self.cache
    }

    /// The cached list, if it is still live. Never touches the store.
    pub fn cached(&self) -> Option<Vec<R>> {
        self.cache.get(R::CACHE_KEY)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Decode fetched documents, skipping ones that fail the boundary checks.
    fn decode_all(docs: Vec<Document>) -> Vec<R> {
        let mut records: Vec<R> = docs
            .into_iter()
            .filter_map(|doc| match decode::<R>(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(collection = R::COLLECTION, error = %e, "Skipping invalid document");
                    None
                }
            })
            .collect();
        R::sort(&mut records);
        records
    }

    async fn fetch_remote(&self) -> StoreResult<Vec<R>> {
        let docs = with_timeout(
            "fetch_all",
            self.timeouts.read,
            self.store.fetch_all(R::COLLECTION),
        )
        .await?;
        Ok(Self::decode_all(docs))
    }

    /// The unfiltered list, from the cache when live, else from the store.
    async fn load(&self) -> StoreResult<Vec<R>> {
        if let Some(list) = self.cached() {
            tracing::debug!(collection = R::COLLECTION, "Cache hit");
            return Ok(list);
        }
        tracing::debug!(collection = R::COLLECTION, "Cache miss");
        let list = self.fetch_remote().await?;
        self.cache.set(R::CACHE_KEY, list.clone());
        Ok(list)
    }

    fn apply_filter(list: Vec<R>, filter: &R::Filter) -> Vec<R> {
        list.into_iter().filter(|r| r.matches(filter)).collect()
    }

    /// Filtered list. The filter is applied to the returned copy only; the
    /// cache keeps the full collection.
    pub async fn get(&self, filter: &R::Filter) -> StoreResult<Vec<R>> {
        Ok(Self::apply_filter(self.load().await?, filter))
    }

    /// Bypass the cache, fetch from the store and overwrite the cache.
    pub async fn get_from_server(&self, filter: &R::Filter) -> StoreResult<Vec<R>> {
        let list = self.fetch_remote().await?;
        self.cache.set(R::CACHE_KEY, list.clone());
        tracing::debug!(collection = R::COLLECTION, count = list.len(), "Refreshed from store");
        Ok(Self::apply_filter(list, filter))
    }

    /// Unfiltered list; failures are logged and yield an empty list.
    pub async fn get_fast(&self) -> Vec<R> {
        match self.load().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(collection = R::COLLECTION, error = %e, "Fast read failed, returning empty list");
                Vec::new()
            }
        }
    }

    /// Look a record up by slug: from the cached list when live, else by an
    /// exact-match query (first match wins, result not cached).
    pub async fn get_by_slug(&self, slug: &str) -> StoreResult<Option<R>> {
        if let Some(list) = self.cached() {
            return Ok(list.into_iter().find(|r| r.slug() == slug));
        }
        let docs = with_timeout(
            "fetch_where_eq",
            self.timeouts.read,
            self.store
                .fetch_where_eq(R::COLLECTION, "slug", &Value::String(slug.to_string())),
        )
        .await?;
        Ok(Self::decode_all(docs).into_iter().next())
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<R>> {
        Ok(self.load().await?.into_iter().find(|r| r.id() == id))
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Create a record under a locally generated id and return it.
    pub async fn add(&self, input: R::New) -> StoreResult<R> {
        let id = self.store.generate_id();
        let record = R::from_new(id, input, Utc::now())?;
        let data = encode(&record)?;

        with_timeout(
            "set",
            self.timeouts.write,
            self.store.set(R::COLLECTION, record.id(), data),
        )
        .await?;
        cache_insert(&self.cache, &record);

        tracing::info!(collection = R::COLLECTION, id = record.id(), slug = record.slug(), "Record created");
        Ok(record)
    }

    /// Apply a partial update to `id`.
    pub async fn update(&self, id: &str, patch: R::Patch) -> StoreResult<()> {
        let patch = R::prepare_patch(patch)?;
        let data = encode_patch(&patch, Utc::now())?;

        with_timeout(
            "update",
            self.timeouts.write,
            self.store.update(R::COLLECTION, id, data.clone()),
        )
        .await?;
        cache_patch(&self.cache, id, &data);

        tracing::info!(collection = R::COLLECTION, id, "Record updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        with_timeout(
            "delete",
            self.timeouts.write,
            self.store.delete(R::COLLECTION, id),
        )
        .await?;
        cache_remove(&self.cache, id);

        tracing::info!(collection = R::COLLECTION, id, "Record deleted");
        Ok(())
    }

    /// Delete every document in one atomic batch. Returns how many went.
    pub async fn delete_all(&self) -> StoreResult<usize> {
        let docs = with_timeout(
            "fetch_all",
            self.timeouts.read,
            self.store.fetch_all(R::COLLECTION),
        )
        .await?;

        let mut batch = WriteBatch::new();
        for doc in docs {
            batch.delete(R::COLLECTION, doc.id);
        }
        let count = batch.len();
        if !batch.is_empty() {
            with_timeout("commit", self.timeouts.write, self.store.commit(batch)).await?;
        }
        cache_clear(&self.cache);

        tracing::info!(collection = R::COLLECTION, count, "All records deleted");
        Ok(count)
    }

    /// Create every item in one atomic batch.
    pub async fn batch_seed(&self, items: Vec<R::New>) -> StoreResult<Vec<R>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let now = Utc::now();
        let mut batch = WriteBatch::new();
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let record = R::from_new(self.store.generate_id(), item, now)?;
            batch.set(R::COLLECTION, record.id().to_string(), encode(&record)?);
            records.push(record);
        }

        with_timeout("commit", self.timeouts.write, self.store.commit(batch)).await?;
        cache_extend(&self.cache, &records);

        tracing::info!(collection = R::COLLECTION, count = records.len(), "Batch created");
        Ok(records)
    }

    /// Apply several partial updates in one atomic batch.
    pub async fn batch_update(&self, updates: Vec<(DocId, R::Patch)>) -> StoreResult<usize> {
        let now = Utc::now();
        let mut patches = Vec::with_capacity(updates.len());
        for (id, patch) in updates {
            let patch = R::prepare_patch(patch)?;
            patches.push((id, encode_patch(&patch, now)?));
        }
        self.commit_patches(patches).await
    }

    async fn commit_patches(&self, patches: Vec<(DocId, DocumentData)>) -> StoreResult<usize> {
        if patches.is_empty() {
            return Ok(0);
        }
        let mut batch = WriteBatch::new();
        for (id, patch) in &patches {
            batch.update(R::COLLECTION, id.clone(), patch.clone());
        }

        with_timeout("commit", self.timeouts.write, self.store.commit(batch)).await?;
        cache_patch_many(&self.cache, &patches);

        tracing::info!(collection = R::COLLECTION, count = patches.len(), "Batch updated");
        Ok(patches.len())
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    async fn existing_by_slug(&self) -> StoreResult<HashMap<String, R>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .map(|r| (r.slug().to_string(), r))
            .collect())
    }

    /// Replace whole documents in one atomic batch.
    async fn commit_rewrites(&self, rewrites: Vec<Document>) -> StoreResult<usize> {
        if rewrites.is_empty() {
            return Ok(0);
        }
        let mut batch = WriteBatch::new();
        let mut records = Vec::with_capacity(rewrites.len());
        for doc in rewrites {
            batch.set(R::COLLECTION, doc.id.clone(), doc.data.clone());
            records.push(decode::<R>(doc)?);
        }

        with_timeout("commit", self.timeouts.write, self.store.commit(batch)).await?;
        cache_extend(&self.cache, &records);
        Ok(records.len())
    }

    /// Which of `items` are already in the store, by slug.
    pub async fn seed_status(&self, items: &[R::New]) -> StoreResult<Vec<SeedItem>> {
        let existing = self.existing_by_slug().await?;
        Ok(items
            .iter()
            .map(|item| {
                let slug = R::new_slug(item);
                let status = if existing.contains_key(&slug) {
                    SeedStatus::Exists
                } else {
                    SeedStatus::Pending
                };
                SeedItem { slug, status }
            })
            .collect())
    }

    /// Seed `items`, diffing against existing slugs.
    ///
    /// New slugs go in one batch create. Existing slugs are skipped, or with
    /// `overwrite` replaced wholesale in one batch that keeps their id and
    /// creation time. Fields the new item leaves out are cleared.
    pub async fn seed(&self, items: Vec<R::New>, overwrite: bool) -> StoreResult<SeedReport> {
        let existing = self.existing_by_slug().await?;
        let now = Utc::now();

        let mut report = SeedReport::default();
        let mut fresh = Vec::new();
        let mut rewrites = Vec::new();

        for item in items {
            let slug = R::new_slug(&item);
            match existing.get(&slug) {
                Some(current) if overwrite => {
                    let id = current.id().to_string();
                    let mut data = encode(&R::from_new(id.clone(), item, now)?)?;
                    if let Some(created_at) = encode(current)?.remove("createdAt") {
                        data.insert("createdAt".into(), created_at);
                    }
                    rewrites.push(Document { id, data });
                    report.items.push(SeedItem { slug, status: SeedStatus::Updated });
                }
                Some(_) => report.items.push(SeedItem { slug, status: SeedStatus::Exists }),
                None => {
                    fresh.push(item);
                    report.items.push(SeedItem { slug, status: SeedStatus::Seeded });
                }
            }
        }

        self.commit_rewrites(rewrites).await?;
        self.batch_seed(fresh).await?;

        tracing::info!(
            collection = R::COLLECTION,
            seeded = report.count(SeedStatus::Seeded),
            updated = report.count(SeedStatus::Updated),
            skipped = report.count(SeedStatus::Exists),
            "Seed complete"
        );
        Ok(report)
    }
}
