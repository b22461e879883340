//! Record types mirrored from the authoritative document store.
//!
//! These are read-side projections of the store's rows: the indexing
//! layer never mutates them, it only derives search documents from them.
//! The search index is a cache; the record store stays authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tag associated with a document.
///
/// Tags carry a display color and arrive in the store's default
/// association order, which the category derivation depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Store primary key
    pub id: i64,

    /// Display name
    pub name: String,

    /// Display color (hex string, e.g. "#a6cee3")
    pub color: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(id: i64, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }
}

/// A document classification kind (zero-or-one per document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentKind {
    /// Store primary key
    pub id: i64,

    /// Display name
    pub name: String,
}

impl DocumentKind {
    /// Create a new kind
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A stored document entity.
///
/// The fundamental unit the index derives from. Tag order is the store's
/// default association order and is preserved verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Store primary key
    pub id: i64,

    /// Document title
    pub title: String,

    /// Free-text content
    pub content: String,

    /// Original filename, if any
    #[serde(default)]
    pub filename: Option<String>,

    /// Popularity score used to weight autocomplete suggestions
    #[serde(default)]
    pub popularity: Option<i64>,

    /// Creation timestamp (milliseconds since epoch in JSON)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,

    /// Classification kind, if assigned
    #[serde(default)]
    pub kind: Option<DocumentKind>,

    /// Associated tags in default store order
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Document {
    /// Create a new document with the given core fields
    pub fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            filename: None,
            popularity: None,
            created,
            kind: None,
            tags: Vec::new(),
        }
    }

    /// Set the filename
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the popularity score
    pub fn with_popularity(mut self, popularity: i64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    /// Set the classification kind
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the tag associations
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
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
