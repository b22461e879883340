//! # docsearch-index
//!
//! Index mapping and document projection for docsearch.
//!
//! This crate declares how a stored [`docsearch_types::Document`] becomes
//! a search-index document:
//! - Field mappings and analyzers for the index (raw JSON the search
//!   engine consumes at index creation)
//! - Projection of records into denormalized index documents, including
//!   the derived language, category, link, and suggestion fields
//! - The autocomplete suggestion builder
//! - Route resolution for computed link URLs
//! - The index store client used to ship documents

pub mod document;
pub mod error;
pub mod mapping;
pub mod routes;
pub mod store;
pub mod suggest;

pub use document::{project, IndexDocument, KindRef, Links, TagRef};
pub use error::IndexError;
pub use mapping::{index_body, index_mappings, DEFAULT_INDEX_NAME};
pub use routes::{ApiRouteResolver, Route, RouteError, RouteResolver};
pub use store::{ElasticStore, IndexStore, StoreError};
pub use suggest::{construct_suggest, SuggestionEntry};
