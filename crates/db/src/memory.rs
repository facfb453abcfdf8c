//! Process-local store backends.
//!
//! Both backends keep call counters and accept injected latency or failures,
//! which is how the cache-freshness, timeout and rollback behaviour is
//! exercised without a hosted service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::object_store::{ObjectStore, PublicUrlScheme, DEFAULT_BUCKET};
use crate::store::{Document, DocumentData, DocumentStore, WriteBatch, WriteOp};

/// Base URL used by [`MemoryObjectStore::new`].
pub const MEMORY_PUBLIC_BASE_URL: &str = "http://localhost:3000/storage/v1/object/public";

type Collections = HashMap<String, Vec<Document>>;

/// Knobs shared by both memory backends.
#[derive(Debug, Default)]
struct FaultInjection {
    latency: Mutex<Option<Duration>>,
    offline: AtomicBool,
    failures_remaining: AtomicUsize,
}

impl FaultInjection {
    /// Sleep for the configured latency, then fail if offline or a one-shot
    /// failure is pending.
    async fn before_call(&self) -> StoreResult<()> {
        let latency = *self.latency.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("store is offline".into()));
        }
        let pending = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if pending.is_ok() {
            return Err(StoreError::Rejected("injected failure".into()));
        }
        Ok(())
    }

    fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = latency;
    }
}

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

/// In-memory [`DocumentStore`] preserving insertion order per collection.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
    faults: FaultInjection,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read calls (`fetch_all`, `fetch_where_eq`) served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write calls (`set`, `update`, `delete`, `commit`) served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Delay every subsequent call by `latency` (`None` to disable).
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.faults.set_latency(latency);
    }

    /// Reject every subsequent call while `offline` is true.
    pub fn set_offline(&self, offline: bool) {
        self.faults.offline.store(offline, Ordering::SeqCst);
    }

    /// Reject the next `count` calls.
    pub fn fail_next(&self, count: usize) {
        self.faults.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Number of documents currently in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Insert a raw document directly, bypassing counters and faults.
    pub async fn insert_raw(&self, collection: &str, id: &str, data: DocumentData) {
        let mut collections = self.collections.write().await;
        let _ = apply_op(
            &mut collections,
            WriteOp::Set {
                collection: collection.to_string(),
                id: id.to_string(),
                data,
            },
        );
    }
}

/// Apply one write to the map. `Update` on a missing document fails.
fn apply_op(collections: &mut Collections, op: WriteOp) -> StoreResult<()> {
    match op {
        WriteOp::Set {
            collection,
            id,
            data,
        } => {
            let docs = collections.entry(collection).or_default();
            match docs.iter_mut().find(|d| d.id == id) {
                Some(existing) => existing.data = data,
                None => docs.push(Document { id, data }),
            }
            Ok(())
        }
        WriteOp::Update {
            collection,
            id,
            patch,
        } => {
            let doc = collections
                .get_mut(&collection)
                .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.clone(),
                    id: id.clone(),
                })?;
            doc.data.extend(patch);
            Ok(())
        }
        WriteOp::Delete { collection, id } => {
            if let Some(docs) = collections.get_mut(&collection) {
                docs.retain(|d| d.id != id);
            }
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.faults.before_call().await?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_where_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        self.faults.before_call().await?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.data.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set(&self, collection: &str, id: &str, data: DocumentData) -> StoreResult<()> {
        let mut batch = WriteBatch::new();
        batch.set(collection, id.to_string(), data);
        self.commit(batch).await
    }

    async fn update(&self, collection: &str, id: &str, patch: DocumentData) -> StoreResult<()> {
        let mut batch = WriteBatch::new();
        batch.update(collection, id.to_string(), patch);
        self.commit(batch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut batch = WriteBatch::new();
        batch.delete(collection, id.to_string());
        self.commit(batch).await
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        self.faults.before_call().await?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut collections = self.collections.write().await;
        // Stage on a copy so a failing op leaves the store untouched.
        let mut staged = collections.clone();
        for op in batch.into_ops() {
            apply_op(&mut staged, op)?;
        }
        *collections = staged;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-memory [`ObjectStore`].
#[derive(Debug)]
pub struct MemoryObjectStore {
    urls: PublicUrlScheme,
    objects: RwLock<HashMap<String, StoredObject>>,
    faults: FaultInjection,
    uploads: AtomicUsize,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::with_public_base(MEMORY_PUBLIC_BASE_URL)
    }

    pub fn with_public_base(base_url: &str) -> Self {
        Self {
            urls: PublicUrlScheme::new(base_url, DEFAULT_BUCKET),
            objects: RwLock::new(HashMap::new()),
            faults: FaultInjection::default(),
            uploads: AtomicUsize::new(0),
        }
    }

    /// Number of upload attempts that reached the store (including failures).
    pub fn upload_attempts(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Reject the next `count` calls.
    pub fn fail_next(&self, count: usize) {
        self.faults.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `latency` (`None` to disable).
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.faults.set_latency(latency);
    }

    pub async fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> StoreResult<()> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.faults.before_call().await?;
        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.urls.url_for(path)
    }

    fn path_from_public_url(&self, url: &str) -> Option<String> {
        self.urls.path_for(url)
    }

    async fn remove(&self, paths: &[String]) -> StoreResult<()> {
        self.faults.before_call().await?;
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }
}
