//! Error types for index mapping and projection.

use thiserror::Error;

use crate::routes::RouteError;
use crate::store::StoreError;

/// Errors that can occur while building or shipping index documents.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Named route could not be resolved for a record
    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    /// Index store operation failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndexError::Route(RouteError::UnknownRecord(7));
        assert_eq!(err.to_string(), "Route error: Unknown record: 7");
    }
}
