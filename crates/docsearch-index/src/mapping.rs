//! Search-index settings and field mappings.
//!
//! Declares the analysis chain and document fields as the raw JSON the
//! search engine consumes at index creation. Text fields carry
//! positions+offsets term vectors for highlighting and a `raw` keyword
//! sub-field for sorting and filtering.

use serde_json::{json, Value};

/// Default name of the document index.
pub const DEFAULT_INDEX_NAME: &str = "documents";

/// Text field with term vectors and a raw keyword sub-field.
fn text_with_raw(analyzer: &str) -> Value {
    json!({
        "type": "text",
        "term_vector": "with_positions_offsets",
        "analyzer": analyzer,
        "fields": {
            "raw": { "type": "keyword" }
        }
    })
}

/// Analysis settings: analyzers and token filters.
///
/// Stopword filtering covers French, Arabic, and English. The suggestion
/// analyzer tokenizes on whitespace so names like O'Brian or
/// Toulouse-Lautrec stay single terms.
pub fn analysis_settings() -> Value {
    json!({
        "filter": {
            "ascii_fold": { "type": "asciifolding" },
            "french_stop": {
                "type": "stop",
                "stopwords": "_french_",
                "ignore_case": true
            },
            "arabic_stop": {
                "type": "stop",
                "stopwords": "_arabic_",
                "ignore_case": true
            },
            "english_stop": {
                "type": "stop",
                "stopwords": "_english_",
                "ignore_case": true
            },
            "html_strip": { "type": "html_strip" }
        },
        "analyzer": {
            "ascii_fold": {
                "tokenizer": "whitespace",
                "filter": ["lowercase", "ascii_fold"]
            },
            "search_analyzer": {
                "type": "custom",
                "tokenizer": "standard",
                "filter": [
                    "lowercase",
                    "french_stop",
                    "arabic_stop",
                    "english_stop",
                    "html_strip"
                ]
            },
            "default_analyzer": {
                "type": "custom",
                "tokenizer": "standard",
                "filter": ["lowercase"]
            }
        }
    })
}

/// Field mappings for the document index.
pub fn index_mappings() -> Value {
    json!({
        "properties": {
            "id": { "type": "keyword" },
            "title": text_with_raw("default_analyzer"),
            "type": {
                "type": "object",
                "properties": {
                    "id": { "type": "keyword" },
                    "name": text_with_raw("default_analyzer")
                }
            },
            "tags": {
                "type": "nested",
                "properties": {
                    "id": { "type": "keyword" },
                    "name": text_with_raw("default_analyzer"),
                    "color": { "type": "keyword" }
                }
            },
            "text": {
                "type": "text",
                "term_vector": "with_positions_offsets",
                "analyzer": "search_analyzer"
            },
            "suggest": {
                "type": "completion",
                "analyzer": "ascii_fold"
            },
            "language": { "type": "keyword" },
            "category": text_with_raw("default_analyzer"),
            "links": {
                "type": "object",
                "properties": {
                    "thumbnail": { "type": "keyword" },
                    "preview": { "type": "keyword" },
                    "download": { "type": "keyword" }
                }
            },
            "created": { "type": "date" },
            "filename": { "type": "keyword" }
        }
    })
}

/// Full index creation body: analysis settings plus mappings.
pub fn index_body() -> Value {
    json!({
        "settings": {
            "analysis": analysis_settings()
        },
        "mappings": index_mappings()
    })
}
