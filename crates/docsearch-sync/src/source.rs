//! Record source contract.
//!
//! The authoritative record store lives outside this workspace; the
//! pipeline only needs to fetch records and enumerate the records
//! associated with a changed tag or kind.

use thiserror::Error;

use docsearch_types::Document;

/// Errors from the record store backend.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Backend failure (connection, query, decoding)
    #[error("Record store error: {0}")]
    Backend(String),
}

/// Read access to the authoritative record store.
///
/// `for_tag` and `for_kind` drive related-entity fan-out: every record
/// they return is re-derived when the entity changes. Implementations
/// must preserve the store's default tag ordering on returned records.
pub trait RecordSource: Send + Sync {
    /// Fetch one record by id. `None` when the record no longer exists.
    fn get(&self, record_id: i64) -> Result<Option<Document>, SourceError>;

    /// Enumerate every record (used by full rebuilds).
    fn all(&self) -> Result<Vec<Document>, SourceError>;

    /// Enumerate records associated with a tag.
    fn for_tag(&self, tag_id: i64) -> Result<Vec<Document>, SourceError>;

    /// Enumerate records associated with a classification kind.
    fn for_kind(&self, kind_id: i64) -> Result<Vec<Document>, SourceError>;
}
