//! Document projection from store records to index documents.
//!
//! The index document is a denormalized cache derived from the record and
//! its associations; the record store stays authoritative. Missing record
//! attributes resolve to null/empty fields, never to projection errors.
//! Only route resolution can fail here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docsearch_types::Document;

use crate::error::IndexError;
use crate::routes::{Route, RouteError, RouteResolver};
use crate::suggest::{construct_suggest, SuggestionEntry};

/// Language value for French filenames (and the cascade fallthrough).
pub const LANGUAGE_FRENCH: &str = "Français";

/// Language value for Arabic filenames.
pub const LANGUAGE_ARABIC: &str = "العربية";

/// Classification kind as stored in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindRef {
    pub id: i64,
    pub name: String,
}

/// Tag as stored in the index (nested field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// Computed link URLs for a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub thumbnail: String,
    pub preview: String,
    pub download: String,
}

/// Denormalized projection of a record for the search index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Record id; also used as the index document id
    pub id: i64,

    /// Record title
    pub title: String,

    /// Classification kind, if assigned
    #[serde(rename = "type")]
    pub kind: Option<KindRef>,

    /// All associated tags in store order
    pub tags: Vec<TagRef>,

    /// Free-text content
    pub text: String,

    /// Autocomplete suggestions derived from title and popularity
    pub suggest: Vec<SuggestionEntry>,

    /// Language guess derived from the filename
    pub language: Option<String>,

    /// Tag names excluding the primary tag
    pub category: Vec<String>,

    /// Computed link URLs
    pub links: Links,

    /// Record creation timestamp (epoch milliseconds in JSON)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,

    /// Original filename, if any
    pub filename: Option<String>,
}

impl IndexDocument {
    /// The id this document is stored under in the index.
    pub fn doc_id(&self) -> String {
        self.id.to_string()
    }

    /// Serialize to the JSON source the index store ships.
    pub fn to_value(&self) -> Result<serde_json::Value, IndexError> {
        serde_json::to_value(self).map_err(IndexError::from)
    }
}

/// Project a record into its index document.
///
/// Route resolution is the only fallible step; a failed link aborts the
/// projection so the record is surfaced as a sync failure rather than
/// indexed with missing links.
pub fn project(record: &Document, routes: &dyn RouteResolver) -> Result<IndexDocument, IndexError> {
    let links = prepare_links(record, routes)?;

    Ok(IndexDocument {
        id: record.id,
        title: record.title.clone(),
        kind: record.kind.as_ref().map(|k| KindRef {
            id: k.id,
            name: k.name.clone(),
        }),
        tags: record
            .tags
            .iter()
            .map(|t| TagRef {
                id: t.id,
                name: t.name.clone(),
                color: t.color.clone(),
            })
            .collect(),
        text: record.content.clone(),
        suggest: construct_suggest(Some(&record.title), record.popularity),
        language: prepare_language(record),
        category: prepare_category(record),
        links,
        created: record.created,
        filename: record.filename.clone(),
    })
}

/// Guess the record language from its filename.
///
/// Substring cascade: "fr" wins over "ar", and filenames matching neither
/// marker fall through to French. No filename means no guess.
pub fn prepare_language(record: &Document) -> Option<String> {
    let filename = record.filename.as_deref().unwrap_or("");
    if filename.is_empty() {
        return None;
    }
    let lower = filename.to_lowercase();
    if lower.contains("fr") {
        return Some(LANGUAGE_FRENCH.to_string());
    }
    if lower.contains("ar") {
        return Some(LANGUAGE_ARABIC.to_string());
    }
    Some(LANGUAGE_FRENCH.to_string())
}

/// Category values: tag names with the primary tag excluded.
pub fn prepare_category(record: &Document) -> Vec<String> {
    // skip first tag
    record.tags.iter().skip(1).map(|t| t.name.clone()).collect()
}

fn prepare_links(record: &Document, routes: &dyn RouteResolver) -> Result<Links, RouteError> {
    Ok(Links {
        thumbnail: routes.resolve(Route::Thumbnail, record.id)?,
        preview: routes.resolve(Route::Preview, record.id)?,
        download: routes.resolve(Route::Download, record.id)?,
    })
}
