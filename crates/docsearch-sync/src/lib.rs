//! Sync pipeline for the docsearch system.
//!
//! This crate keeps the search index aligned with the authoritative
//! record store by consuming change events and shipping derived
//! documents.
//!
//! ## Key Components
//!
//! - [`IndexRegistry`]: explicit registry of index definitions, built at
//!   startup and handed to the pipeline
//! - [`RecordSource`]: contract for fetching records and enumerating
//!   related-entity associations
//! - [`SyncQueue`]: sequence-numbered queue of change events
//! - [`SyncCheckpoint`]: tracks consumption progress
//! - [`SyncPipeline`]: consumes queue entries and updates the index
//! - [`rebuild_index`]: reconstructs the index from scratch
//!
//! ## Architecture
//!
//! 1. Data mutations push [`docsearch_types::SyncEntry`] values onto the
//!    queue (record upsert/delete, tag or kind change)
//! 2. The pipeline consumes entries in sequence order
//! 3. Record entries project and ship one document; related-entity
//!    entries fan out to a full re-sync of the association
//! 4. The checkpoint tracks the last consumed sequence so processed
//!    entries can be cleaned up
//!
//! ## Example
//!
//! ```ignore
//! use docsearch_sync::{IndexRegistry, IndexDefinition, SyncConfig, SyncPipeline, SyncQueue};
//!
//! let mut registry = IndexRegistry::new();
//! registry.register(IndexDefinition::new("documents", docsearch_index::index_body()));
//!
//! let mut pipeline = SyncPipeline::new(source, store, routes, registry, queue, config);
//! pipeline.ensure_indexes()?;
//!
//! // Process until caught up
//! let result = pipeline.process_until_caught_up(100)?;
//!
//! // Drop consumed entries
//! pipeline.cleanup_queue();
//! ```

pub mod checkpoint;
pub mod error;
pub mod pipeline;
pub mod queue;
pub mod rebuild;
pub mod registry;
pub mod source;

pub use checkpoint::SyncCheckpoint;
pub use error::SyncError;
pub use pipeline::{BatchResult, SyncConfig, SyncPipeline};
pub use queue::SyncQueue;
pub use rebuild::{
    rebuild_index, LoggingProgressCallback, NoOpProgressCallback, ProgressCallback,
    RebuildConfig, RebuildProgress, RebuildResult,
};
pub use registry::{IndexDefinition, IndexRegistry};
pub use source::{RecordSource, SourceError};
