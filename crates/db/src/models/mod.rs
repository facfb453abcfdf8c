//! Typed records stored in the document collections.
//!
//! Records are decoded from raw documents at the store boundary and checked
//! there; anything that fails to decode never reaches the cache.

pub mod artwork;
pub mod blog;
pub mod collection;

use std::fmt::Debug;

use hearts_core::error::CoreError;
use hearts_core::types::{DocId, Timestamp};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::{StoreError, StoreResult};
use crate::store::{clean_data, Document, DocumentData};

pub use artwork::{
    Artwork, ArtworkFilter, ArtworkPatch, NewArtwork, Symbolism, ARTWORKS_CACHE_KEY,
};
pub use blog::{Blog, BlogFilter, BlogPatch, NewBlog, BLOGS_CACHE_KEY};
pub use collection::{find_collection, summarize_collections, CollectionDetail, CollectionSummary};

/// Where a record's image came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    #[default]
    Upload,
    Url,
}

/// A record type living in one document collection.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name in the document store.
    const COLLECTION: &'static str;
    /// Cache key holding the whole (unfiltered) collection list.
    const CACHE_KEY: &'static str;
    /// Human-readable entity name for errors and logs.
    const ENTITY: &'static str;

    /// Read-side predicate applied to returned lists, never to the cache.
    type Filter: Debug + Default + Clone + Send + Sync;
    /// Input for creating a record.
    type New: Debug + Clone + Validate + Send + Sync;
    /// Partial update; unset fields are left alone.
    type Patch: Debug + Clone + Serialize + Send + Sync;

    fn id(&self) -> &str;
    fn slug(&self) -> &str;

    /// Slug a new record will be stored under.
    fn new_slug(new: &Self::New) -> String;

    /// Canonical display order for the collection.
    fn sort(list: &mut [Self]);

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Structural checks on a decoded document.
    fn check(&self) -> Result<(), String>;

    /// Build the full record for a validated input under a pre-generated id.
    fn from_new(id: DocId, new: Self::New, now: Timestamp) -> Result<Self, CoreError>;

    /// Validate and normalise a patch before it is written.
    fn prepare_patch(patch: Self::Patch) -> Result<Self::Patch, CoreError>;
}

/// Flatten `validator` errors into one readable message.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Run `validator` checks, mapping failures to [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(validation_message(&e)))
}

/// Decode a raw document into a checked record.
pub fn decode<R: Record>(doc: Document) -> StoreResult<R> {
    let Document { id, mut data } = doc;
    data.insert("id".into(), Value::String(id.clone()));

    let schema_error = |reason: String| StoreError::Schema {
        collection: R::COLLECTION.to_string(),
        id: id.clone(),
        reason,
    };

    let record: R =
        serde_json::from_value(Value::Object(data)).map_err(|e| schema_error(e.to_string()))?;
    record.check().map_err(schema_error)?;
    Ok(record)
}

/// Storable fields of a record (everything but its id, nulls stripped).
pub fn encode<R: Record>(record: &R) -> StoreResult<DocumentData> {
    let mut data = clean_data(serde_json::to_value(record)?)?;
    data.remove("id");
    Ok(data)
}

/// Storable fields of a patch, plus the new `updatedAt` stamp.
pub fn encode_patch<P: Serialize>(patch: &P, now: Timestamp) -> StoreResult<DocumentData> {
    let mut data = clean_data(serde_json::to_value(patch)?)?;
    data.remove("id");
    data.remove("createdAt");
    data.insert("updatedAt".into(), serde_json::to_value(now)?);
    Ok(data)
}

/// Shallow-merge stored fields into a record, as the store does for updates.
pub fn merge<R: Record>(record: &R, patch: &DocumentData) -> StoreResult<R> {
    let mut data = match serde_json::to_value(record)? {
        Value::Object(map) => map,
        _ => return Err(StoreError::Rejected(format!("{} is not an object", R::ENTITY))),
    };
    data.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
    data.insert("id".into(), Value::String(record.id().to_string()));
    Ok(serde_json::from_value(Value::Object(data))?)
}

pub(crate) fn default_true() -> bool {
    true
}

/// Trim an optional text field, treating blank as unset.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reject a patch field that is present but blank.
pub(crate) fn require_non_blank(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(CoreError::Validation(format!("{field} must not be empty")))
        }
        _ => Ok(()),
    }
}
