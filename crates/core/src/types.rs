/// Document ids are generated client-side before the write (see
/// `DocumentStore::generate_id`), so they are opaque strings.
pub type DocId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
