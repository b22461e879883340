//! # docsearch-types
//!
//! Shared domain types for the docsearch indexing system.
//!
//! This crate defines the core data structures used throughout the system:
//! - Records: documents, tags, and classification kinds from the
//!   authoritative store
//! - Sync entries: change events consumed by the indexing pipeline
//! - Settings: connection and sync configuration

pub mod config;
pub mod error;
pub mod event;
pub mod record;

pub use config::Settings;
pub use error::TypesError;
pub use event::{SyncAction, SyncEntry};
pub use record::{Document, DocumentKind, Tag};
