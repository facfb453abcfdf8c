use std::time::Duration;

use hearts_core::error::CoreError;
use hearts_core::types::DocId;

/// Errors raised at the store boundary.
///
/// `Timeout` covers calls that exceeded their budget; `Rejected`, `NotFound`,
/// `Backend` and `Database` are failures reported by the backend itself; `Schema` is a
/// document that does not decode into its typed record; `Core` carries input
/// validation failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{operation} timed out after {}ms", after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: DocId },

    #[error("Store rejected the request: {0}")]
    Rejected(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Malformed document {collection}/{id}: {reason}")]
    Schema {
        collection: String,
        id: DocId,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for store-layer results.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Whether the error came from a timeout rather than the backend.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout { .. })
    }
}
