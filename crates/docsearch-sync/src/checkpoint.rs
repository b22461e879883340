//! Checkpoint tracking for the sync pipeline.
//!
//! The checkpoint records the last consumed queue sequence so processing
//! is resumable and consumed entries can be cleaned up. Callers that
//! need durability persist it through the JSON helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Progress marker for queue consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncCheckpoint {
    /// Last queue sequence number consumed (0 = nothing yet)
    pub last_sequence: u64,

    /// Timestamp of last processing (epoch milliseconds in JSON)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_processed_time: DateTime<Utc>,

    /// Total entries processed since checkpoint creation
    pub processed_count: u64,

    /// When this checkpoint was first created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl SyncCheckpoint {
    /// Create a fresh checkpoint.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            last_sequence: 0,
            last_processed_time: now,
            processed_count: 0,
            created_at: now,
        }
    }

    /// Create a checkpoint starting at a specific sequence.
    pub fn with_sequence(sequence: u64) -> Self {
        Self {
            last_sequence: sequence,
            ..Self::new()
        }
    }

    /// Advance the checkpoint after processing entries.
    pub fn update(&mut self, new_sequence: u64, items_processed: u64) {
        self.last_sequence = new_sequence;
        self.last_processed_time = Utc::now();
        self.processed_count += items_processed;
    }

    /// Serialize to JSON bytes for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SyncError> {
        serde_json::to_vec(self).map_err(SyncError::from)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SyncError> {
        serde_json::from_slice(bytes).map_err(SyncError::from)
    }
}

impl Default for SyncCheckpoint {
    fn default() -> Self {
        Self::new()
    }
}
