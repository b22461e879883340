//! Sync entry type for index updates.
//!
//! Data mutations enqueue sync entries; the indexing pipeline consumes
//! them in sequence order. Related-entity changes (tag, kind) fan out to
//! every associated record when the entry is processed, so producers only
//! record *what* changed, never the affected record set.

use serde::{Deserialize, Serialize};

/// Type of sync action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// Create or refresh the index document for a record
    IndexRecord,
    /// Remove a record's document from the index
    DeleteRecord,
    /// Re-derive every record associated with a changed tag
    ReindexTag,
    /// Re-derive every record associated with a changed kind
    ReindexKind,
}

/// A sync entry for pipeline processing.
///
/// `subject_id` is the record id for record actions and the related
/// entity's id for reindex actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEntry {
    /// Record or related-entity id, depending on action
    pub subject_id: i64,

    /// Timestamp of the source mutation (for ordering)
    pub timestamp_ms: i64,

    /// What action should be performed
    pub action: SyncAction,
}

impl SyncEntry {
    /// Create an entry for record indexing
    pub fn for_record(record_id: i64, timestamp_ms: i64) -> Self {
        Self {
            subject_id: record_id,
            timestamp_ms,
            action: SyncAction::IndexRecord,
        }
    }

    /// Create an entry for record deletion
    pub fn for_delete(record_id: i64, timestamp_ms: i64) -> Self {
        Self {
            subject_id: record_id,
            timestamp_ms,
            action: SyncAction::DeleteRecord,
        }
    }

    /// Create an entry for tag fan-out reindexing
    pub fn for_tag(tag_id: i64, timestamp_ms: i64) -> Self {
        Self {
            subject_id: tag_id,
            timestamp_ms,
            action: SyncAction::ReindexTag,
        }
    }

    /// Create an entry for kind fan-out reindexing
    pub fn for_kind(kind_id: i64, timestamp_ms: i64) -> Self {
        Self {
            subject_id: kind_id,
            timestamp_ms,
            action: SyncAction::ReindexKind,
        }
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
