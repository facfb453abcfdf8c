//! Document-store seam.
//!
//! The data layer talks to the hosted database only through
//! [`DocumentStore`]: whole-collection scans, exact-match queries, single
//! document writes, and atomic multi-document batches. Documents are loose
//! JSON objects here; typing happens one layer up in [`crate::models`].
//!
//! Backends:
//! - [`crate::memory::MemoryDocumentStore`] -- process-local, used by tests and dev mode
//! - [`crate::postgres::PgDocumentStore`] -- JSONB rows in PostgreSQL

use std::fmt::Debug;

use async_trait::async_trait;
use hearts_core::types::DocId;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Field map of a stored document (everything except its id).
pub type DocumentData = serde_json::Map<String, Value>;

/// Collection holding artwork documents.
pub const COLLECTION_ARTWORKS: &str = "artworks";

/// Collection holding blog post documents.
pub const COLLECTION_BLOGS: &str = "blogs";

/// A document as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    pub data: DocumentData,
}

/// One operation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or overwrite the whole document.
    Set {
        collection: String,
        id: DocId,
        data: DocumentData,
    },
    /// Merge top-level fields into an existing document.
    Update {
        collection: String,
        id: DocId,
        patch: DocumentData,
    },
    /// Remove the document. Deleting a missing document is not an error.
    Delete { collection: String, id: DocId },
}

/// A list of writes committed atomically by [`DocumentStore::commit`].
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, collection: &str, id: DocId, data: DocumentData) -> &mut Self {
        self.ops.push(WriteOp::Set {
            collection: collection.to_string(),
            id,
            data,
        });
        self
    }

    pub fn update(&mut self, collection: &str, id: DocId, patch: DocumentData) -> &mut Self {
        self.ops.push(WriteOp::Update {
            collection: collection.to_string(),
            id,
            patch,
        });
        self
    }

    pub fn delete(&mut self, collection: &str, id: DocId) -> &mut Self {
        self.ops.push(WriteOp::Delete {
            collection: collection.to_string(),
            id,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Hosted document database.
#[async_trait]
pub trait DocumentStore: Debug + Send + Sync {
    /// Pre-generate a document id locally, before any write.
    fn generate_id(&self) -> DocId {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Every document in a collection, in insertion order.
    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Documents whose top-level `field` equals `value`.
    async fn fetch_where_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>>;

    /// Create or overwrite a document.
    async fn set(&self, collection: &str, id: &str, data: DocumentData) -> StoreResult<()>;

    /// Merge fields into an existing document.
    ///
    /// Returns [`StoreError::NotFound`] when the document does not exist.
    async fn update(&self, collection: &str, id: &str, patch: DocumentData) -> StoreResult<()>;

    /// Delete a document.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Apply every operation in the batch, or none of them.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;
}

/// Turn a serialized record into storable fields.
///
/// The store rejects explicit nulls, so top-level `null` values are dropped.
/// Fails if the value is not a JSON object.
pub fn clean_data(value: Value) -> StoreResult<DocumentData> {
    match value {
        Value::Object(map) => Ok(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => Err(StoreError::Rejected(format!(
            "Documents must be JSON objects, got {other}"
        ))),
    }
}
