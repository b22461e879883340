//! Error types for the sync pipeline.

use docsearch_index::{IndexError, StoreError};
use thiserror::Error;

use crate::source::SourceError;

/// Errors that can occur while syncing records to the index.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Record store operation failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Index store operation failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Record could not be projected into an index document
    #[error("Projection error: {0}")]
    Projection(#[from] IndexError),

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}
