//! Full index rebuild from the record store.
//!
//! Reconstructs the search index from scratch by enumerating every
//! record, projecting it, and shipping documents in bulk batches.

use tracing::{info, warn};

use docsearch_index::{project, IndexStore, RouteResolver};

use crate::error::SyncError;
use crate::source::RecordSource;

/// Configuration for a rebuild run.
#[derive(Debug, Clone)]
pub struct RebuildConfig {
    /// Index to rebuild
    pub index: String,
    /// Index creation body (settings + mappings)
    pub body: serde_json::Value,
    /// Documents per bulk request
    pub batch_size: usize,
    /// Whether to drop the index before rebuilding
    pub clear_first: bool,
    /// Whether to continue on individual record errors
    pub continue_on_error: bool,
}

impl RebuildConfig {
    /// Create a config for the given index.
    pub fn new(index: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            index: index.into(),
            body,
            batch_size: 100,
            clear_first: true,
            continue_on_error: true,
        }
    }

    /// Set the bulk batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set whether to drop the index first.
    pub fn with_clear_first(mut self, clear: bool) -> Self {
        self.clear_first = clear;
        self
    }

    /// Set whether to continue on errors.
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }
}

/// Progress counters for a rebuild.
#[derive(Debug, Clone, Default)]
pub struct RebuildProgress {
    /// Records handled so far
    pub total_processed: u64,
    /// Documents accepted by the index store
    pub indexed: u64,
    /// Records that failed to project or were rejected
    pub errors: u64,
    /// Whether the rebuild ran to completion
    pub completed: bool,
}

impl RebuildProgress {
    /// Create a new progress tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record accepted documents.
    pub fn record_indexed(&mut self, count: u64) {
        self.indexed += count;
        self.total_processed += count;
    }

    /// Record failed records.
    pub fn record_errors(&mut self, count: u64) {
        self.errors += count;
        self.total_processed += count;
    }

    /// Mark the rebuild as completed.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }
}

/// Result of a rebuild run.
#[derive(Debug)]
pub struct RebuildResult {
    /// Progress statistics
    pub progress: RebuildProgress,
    /// Wall time in milliseconds
    pub elapsed_ms: u64,
}

/// Receives progress updates after each bulk batch.
pub trait ProgressCallback: Send {
    fn on_progress(&self, progress: &RebuildProgress);
}

/// Callback for when progress reporting isn't needed.
pub struct NoOpProgressCallback;

impl ProgressCallback for NoOpProgressCallback {
    fn on_progress(&self, _progress: &RebuildProgress) {}
}

/// Callback that logs progress at info level.
pub struct LoggingProgressCallback;

impl ProgressCallback for LoggingProgressCallback {
    fn on_progress(&self, progress: &RebuildProgress) {
        info!(
            total = progress.total_processed,
            indexed = progress.indexed,
            errors = progress.errors,
            "Rebuild progress"
        );
    }
}

/// Rebuild the index from every record in the store.
///
/// Store-level failures (index creation, bulk transport) abort the run;
/// per-record projection failures respect `continue_on_error`.
pub fn rebuild_index(
    source: &dyn RecordSource,
    store: &dyn IndexStore,
    routes: &dyn RouteResolver,
    config: &RebuildConfig,
    callback: &dyn ProgressCallback,
) -> Result<RebuildResult, SyncError> {
    let started = std::time::Instant::now();

    if config.clear_first {
        store.delete_index(&config.index)?;
    }
    store.ensure_index(&config.index, &config.body)?;

    let records = source.all()?;
    info!(
        index = %config.index,
        count = records.len(),
        "Rebuilding index"
    );

    let mut progress = RebuildProgress::new();

    for chunk in records.chunks(config.batch_size.max(1)) {
        let mut batch = Vec::with_capacity(chunk.len());

        for record in chunk {
            match project(record, routes) {
                Ok(doc) => match doc.to_value() {
                    Ok(source_value) => batch.push((doc.doc_id(), source_value)),
                    Err(e) => {
                        warn!(record_id = record.id, error = %e, "Failed to encode document");
                        progress.record_errors(1);
                        if !config.continue_on_error {
                            return Err(e.into());
                        }
                    }
                },
                Err(e) => {
                    warn!(record_id = record.id, error = %e, "Failed to project record");
                    progress.record_errors(1);
                    if !config.continue_on_error {
                        return Err(e.into());
                    }
                }
            }
        }

        let accepted = store.bulk_put(&config.index, &batch)?;
        progress.record_indexed(accepted as u64);
        progress.record_errors((batch.len() - accepted) as u64);

        callback.on_progress(&progress);
    }

    store.refresh(&config.index)?;
    progress.mark_completed();

    info!(
        index = %config.index,
        indexed = progress.indexed,
        errors = progress.errors,
        "Rebuild complete"
    );

    Ok(RebuildResult {
        progress,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}
