//! Sync pipeline consuming queue entries.
//!
//! Processing is synchronous and inline under the host's single-writer
//! assumption; batching and bulk parallelism belong to the index store
//! client. Per-entry failures are surfaced through logs and batch stats,
//! never silently swallowed.

use std::sync::Arc;

use tracing::{debug, info, warn};

use docsearch_index::{project, IndexStore, RouteResolver};
use docsearch_types::{Document, Settings, SyncAction, SyncEntry};

use crate::checkpoint::SyncCheckpoint;
use crate::error::SyncError;
use crate::queue::SyncQueue;
use crate::registry::IndexRegistry;
use crate::source::RecordSource;

/// Configuration for the sync pipeline.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Target index name
    pub index: String,
    /// Maximum entries to process per batch
    pub batch_size: usize,
    /// Whether to continue processing on individual entry errors
    pub continue_on_error: bool,
    /// Whether to refresh the index after each batch
    pub refresh_after_batch: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            index: docsearch_index::DEFAULT_INDEX_NAME.to_string(),
            batch_size: 100,
            continue_on_error: true,
            refresh_after_batch: false,
        }
    }
}

impl SyncConfig {
    /// Derive pipeline configuration from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            index: settings.index.clone(),
            batch_size: settings.batch_size,
            ..Self::default()
        }
    }

    /// Set the target index name.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set whether to continue on errors.
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Set whether to refresh after each batch.
    pub fn with_refresh_after_batch(mut self, refresh: bool) -> Self {
        self.refresh_after_batch = refresh;
        self
    }
}

/// Per-entry processing outcome. Fan-out entries touch many records.
#[derive(Debug, Default)]
struct EntryOutcome {
    processed: usize,
    skipped: usize,
    errors: usize,
}

impl EntryOutcome {
    fn processed(count: usize) -> Self {
        Self {
            processed: count,
            ..Self::default()
        }
    }

    fn skipped(count: usize) -> Self {
        Self {
            skipped: count,
            ..Self::default()
        }
    }
}

/// Result of processing a batch of sync entries.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Number of documents successfully shipped or deleted
    pub processed: usize,
    /// Number of entries/records skipped (record gone, empty fan-out)
    pub skipped: usize,
    /// Number of failures encountered
    pub errors: usize,
    /// The highest sequence number consumed
    pub last_sequence: Option<u64>,
}

impl BatchResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    fn absorb(&mut self, outcome: &EntryOutcome) {
        self.processed += outcome.processed;
        self.skipped += outcome.skipped;
        self.errors += outcome.errors;
    }

    fn set_sequence(&mut self, sequence: u64) {
        self.last_sequence = Some(sequence);
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: &BatchResult) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.errors += other.errors;
        if other.last_sequence > self.last_sequence {
            self.last_sequence = other.last_sequence;
        }
    }

    /// Check if any documents were shipped or deleted.
    pub fn has_updates(&self) -> bool {
        self.processed > 0
    }

    /// Total records handled (success + skip + error).
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.errors
    }
}

/// Pipeline consuming sync entries and updating the search index.
pub struct SyncPipeline {
    source: Arc<dyn RecordSource>,
    store: Arc<dyn IndexStore>,
    routes: Arc<dyn RouteResolver>,
    registry: IndexRegistry,
    queue: Arc<SyncQueue>,
    checkpoint: SyncCheckpoint,
    config: SyncConfig,
}

impl SyncPipeline {
    /// Create a new pipeline.
    pub fn new(
        source: Arc<dyn RecordSource>,
        store: Arc<dyn IndexStore>,
        routes: Arc<dyn RouteResolver>,
        registry: IndexRegistry,
        queue: Arc<SyncQueue>,
        config: SyncConfig,
    ) -> Self {
        Self {
            source,
            store,
            routes,
            registry,
            queue,
            checkpoint: SyncCheckpoint::new(),
            config,
        }
    }

    /// The queue producers push change events onto.
    pub fn queue(&self) -> &Arc<SyncQueue> {
        &self.queue
    }

    /// Current consumption checkpoint.
    pub fn checkpoint(&self) -> &SyncCheckpoint {
        &self.checkpoint
    }

    /// Resume from a previously persisted checkpoint.
    pub fn restore_checkpoint(&mut self, checkpoint: SyncCheckpoint) {
        info!(
            last_sequence = checkpoint.last_sequence,
            "Restored sync checkpoint"
        );
        self.checkpoint = checkpoint;
    }

    /// Create every registered index that does not exist yet.
    pub fn ensure_indexes(&self) -> Result<(), SyncError> {
        self.registry.ensure_all(self.store.as_ref())
    }

    /// Process one batch of queue entries.
    pub fn process_batch(&mut self, limit: usize) -> Result<BatchResult, SyncError> {
        let start_sequence = self.checkpoint.last_sequence;
        let entries = self.queue.entries_after(start_sequence, limit.max(1));

        if entries.is_empty() {
            debug!("No sync entries to process");
            return Ok(BatchResult::new());
        }

        info!(
            start_sequence = start_sequence,
            count = entries.len(),
            "Processing sync entries"
        );

        let mut result = BatchResult::new();

        for (sequence, entry) in &entries {
            match self.apply_entry(entry) {
                Ok(outcome) => result.absorb(&outcome),
                Err(e) => {
                    warn!(
                        sequence = sequence,
                        subject_id = entry.subject_id,
                        action = ?entry.action,
                        error = %e,
                        "Failed to apply sync entry"
                    );
                    if self.config.continue_on_error {
                        result.errors += 1;
                    } else {
                        return Err(e);
                    }
                }
            }
            result.set_sequence(*sequence);
        }

        if self.config.refresh_after_batch && result.has_updates() {
            self.store.refresh(&self.config.index)?;
        }

        if let Some(last_sequence) = result.last_sequence {
            self.checkpoint
                .update(last_sequence, result.processed as u64);
            info!(
                last_sequence = last_sequence,
                processed = result.processed,
                errors = result.errors,
                "Batch processing complete"
            );
        }

        Ok(result)
    }

    /// Process entries until caught up or max iterations reached.
    pub fn process_until_caught_up(
        &mut self,
        max_iterations: usize,
    ) -> Result<BatchResult, SyncError> {
        let mut total = BatchResult::new();
        let mut iterations = 0;

        loop {
            if iterations >= max_iterations {
                info!(iterations = iterations, "Reached max iterations");
                break;
            }

            let batch = self.process_batch(self.config.batch_size)?;
            if batch.last_sequence.is_none() {
                debug!("No more entries to process");
                break;
            }

            total.merge(&batch);
            iterations += 1;
        }

        Ok(total)
    }

    /// Drop queue entries the checkpoint has passed. Returns how many
    /// were removed.
    pub fn cleanup_queue(&self) -> usize {
        self.queue.delete_up_to(self.checkpoint.last_sequence)
    }

    fn apply_entry(&self, entry: &SyncEntry) -> Result<EntryOutcome, SyncError> {
        match entry.action {
            SyncAction::IndexRecord => match self.source.get(entry.subject_id)? {
                Some(record) => {
                    self.ship_record(&record)?;
                    Ok(EntryOutcome::processed(1))
                }
                None => {
                    debug!(
                        record_id = entry.subject_id,
                        "Record missing from source, skipping"
                    );
                    Ok(EntryOutcome::skipped(1))
                }
            },
            SyncAction::DeleteRecord => {
                self.store
                    .delete_document(&self.config.index, &entry.subject_id.to_string())?;
                debug!(record_id = entry.subject_id, "Removed document");
                Ok(EntryOutcome::processed(1))
            }
            SyncAction::ReindexTag => {
                let records = self.source.for_tag(entry.subject_id)?;
                if records.is_empty() {
                    debug!(tag_id = entry.subject_id, "Tag has no associated records");
                    return Ok(EntryOutcome::skipped(1));
                }
                info!(
                    tag_id = entry.subject_id,
                    count = records.len(),
                    "Re-syncing records for changed tag"
                );
                self.reindex_associated(&records)
            }
            SyncAction::ReindexKind => {
                let records = self.source.for_kind(entry.subject_id)?;
                if records.is_empty() {
                    debug!(kind_id = entry.subject_id, "Kind has no associated records");
                    return Ok(EntryOutcome::skipped(1));
                }
                info!(
                    kind_id = entry.subject_id,
                    count = records.len(),
                    "Re-syncing records for changed kind"
                );
                self.reindex_associated(&records)
            }
        }
    }

    /// Project and ship a single record.
    fn ship_record(&self, record: &Document) -> Result<(), SyncError> {
        let doc = project(record, self.routes.as_ref())?;
        let source = doc.to_value()?;
        self.store
            .put_document(&self.config.index, &doc.doc_id(), &source)?;
        debug!(record_id = record.id, "Synced document");
        Ok(())
    }

    /// Full re-sync of an association: project every record, ship in one
    /// bulk request. Records that fail to project are logged and counted
    /// without blocking the rest.
    fn reindex_associated(&self, records: &[Document]) -> Result<EntryOutcome, SyncError> {
        let mut outcome = EntryOutcome::default();
        let mut batch = Vec::with_capacity(records.len());

        for record in records {
            match project(record, self.routes.as_ref()) {
                Ok(doc) => match doc.to_value() {
                    Ok(source) => batch.push((doc.doc_id(), source)),
                    Err(e) => {
                        warn!(record_id = record.id, error = %e, "Failed to encode document");
                        outcome.errors += 1;
                    }
                },
                Err(e) => {
                    warn!(record_id = record.id, error = %e, "Failed to project record");
                    outcome.errors += 1;
                }
            }
        }

        let accepted = self.store.bulk_put(&self.config.index, &batch)?;
        outcome.processed += accepted;
        outcome.errors += batch.len() - accepted;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docsearch_index::{index_body, ApiRouteResolver, StoreError};
    use docsearch_types::{DocumentKind, Tag};
    use serde_json::Value;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use crate::registry::IndexDefinition;
    use crate::source::SourceError;

    struct MemorySource {
        records: Vec<Document>,
    }

    impl MemorySource {
        fn new(records: Vec<Document>) -> Self {
            Self { records }
        }
    }

    impl RecordSource for MemorySource {
        fn get(&self, record_id: i64) -> Result<Option<Document>, SourceError> {
            Ok(self.records.iter().find(|r| r.id == record_id).cloned())
        }

        fn all(&self) -> Result<Vec<Document>, SourceError> {
            Ok(self.records.clone())
        }

        fn for_tag(&self, tag_id: i64) -> Result<Vec<Document>, SourceError> {
            Ok(self
                .records
                .iter()
                .filter(|r| r.tags.iter().any(|t| t.id == tag_id))
                .cloned()
                .collect())
        }

        fn for_kind(&self, kind_id: i64) -> Result<Vec<Document>, SourceError> {
            Ok(self
                .records
                .iter()
                .filter(|r| r.kind.as_ref().is_some_and(|k| k.id == kind_id))
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        docs: Mutex<HashMap<String, Value>>,
        indexes: Mutex<HashSet<String>>,
        fail_writes: bool,
    }

    impl MemoryStore {
        fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        fn doc(&self, doc_id: &str) -> Option<Value> {
            self.docs.lock().unwrap().get(doc_id).cloned()
        }

        fn doc_count(&self) -> usize {
            self.docs.lock().unwrap().len()
        }
    }

    impl IndexStore for MemoryStore {
        fn ensure_index(&self, name: &str, _body: &Value) -> Result<(), StoreError> {
            self.indexes.lock().unwrap().insert(name.to_string());
            Ok(())
        }

        fn delete_index(&self, name: &str) -> Result<(), StoreError> {
            self.indexes.lock().unwrap().remove(name);
            self.docs.lock().unwrap().clear();
            Ok(())
        }

        fn put_document(
            &self,
            _index: &str,
            doc_id: &str,
            source: &Value,
        ) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Rejected {
                    status: 500,
                    reason: "write failure".to_string(),
                });
            }
            self.docs
                .lock()
                .unwrap()
                .insert(doc_id.to_string(), source.clone());
            Ok(())
        }

        fn delete_document(&self, _index: &str, doc_id: &str) -> Result<(), StoreError> {
            self.docs.lock().unwrap().remove(doc_id);
            Ok(())
        }

        fn bulk_put(&self, index: &str, docs: &[(String, Value)]) -> Result<usize, StoreError> {
            for (doc_id, source) in docs {
                self.put_document(index, doc_id, source)?;
            }
            Ok(docs.len())
        }

        fn refresh(&self, _index: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn sample_records() -> Vec<Document> {
        vec![
            Document::new(1, "Invoice March", "Total due", Utc::now())
                .with_popularity(3)
                .with_kind(DocumentKind::new(10, "Invoice"))
                .with_tags(vec![
                    Tag::new(100, "inbox", "#a6cee3"),
                    Tag::new(101, "finance", "#b2df8a"),
                ]),
            Document::new(2, "Meeting notes", "Agenda items", Utc::now())
                .with_kind(DocumentKind::new(11, "Note"))
                .with_tags(vec![Tag::new(100, "inbox", "#a6cee3")]),
            Document::new(3, "Contract draft", "Terms", Utc::now())
                .with_kind(DocumentKind::new(10, "Invoice")),
        ]
    }

    fn build_pipeline(store: Arc<MemoryStore>, records: Vec<Document>) -> SyncPipeline {
        let mut registry = IndexRegistry::new();
        registry.register(IndexDefinition::new("documents", index_body()));

        SyncPipeline::new(
            Arc::new(MemorySource::new(records)),
            store,
            Arc::new(ApiRouteResolver::default()),
            registry,
            Arc::new(SyncQueue::new()),
            SyncConfig::default(),
        )
    }

    #[test]
    fn test_process_batch_empty_queue() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store, sample_records());

        let result = pipeline.process_batch(100).unwrap();
        assert!(!result.has_updates());
        assert!(result.last_sequence.is_none());
    }

    #[test]
    fn test_index_record_entry_ships_document() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store.clone(), sample_records());

        pipeline.queue().push(SyncEntry::for_record(1, 1000));
        let result = pipeline.process_batch(100).unwrap();

        assert_eq!(result.processed, 1);
        assert_eq!(result.errors, 0);

        let doc = store.doc("1").unwrap();
        assert_eq!(doc["title"], "Invoice March");
        assert_eq!(doc["category"][0], "finance");
        assert_eq!(doc["links"]["preview"], "/api/documents/1/preview/");
        assert_eq!(doc["type"]["name"], "Invoice");
    }

    #[test]
    fn test_missing_record_is_skipped() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store, sample_records());

        pipeline.queue().push(SyncEntry::for_record(999, 1000));
        let result = pipeline.process_batch(100).unwrap();

        assert_eq!(result.processed, 0);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, 0);
    }

    #[test]
    fn test_delete_record_entry() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store.clone(), sample_records());

        pipeline.queue().push(SyncEntry::for_record(2, 1000));
        pipeline.process_batch(100).unwrap();
        assert!(store.doc("2").is_some());

        pipeline.queue().push(SyncEntry::for_delete(2, 2000));
        let result = pipeline.process_batch(100).unwrap();

        assert_eq!(result.processed, 1);
        assert!(store.doc("2").is_none());
    }

    #[test]
    fn test_tag_change_fans_out_to_associated_records() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store.clone(), sample_records());

        // tag 100 is on records 1 and 2
        pipeline.queue().push(SyncEntry::for_tag(100, 1000));
        let result = pipeline.process_batch(100).unwrap();

        assert_eq!(result.processed, 2);
        assert!(store.doc("1").is_some());
        assert!(store.doc("2").is_some());
        assert!(store.doc("3").is_none());
    }

    #[test]
    fn test_kind_change_fans_out_to_associated_records() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store.clone(), sample_records());

        // kind 10 is on records 1 and 3
        pipeline.queue().push(SyncEntry::for_kind(10, 1000));
        let result = pipeline.process_batch(100).unwrap();

        assert_eq!(result.processed, 2);
        assert!(store.doc("1").is_some());
        assert!(store.doc("3").is_some());
        assert!(store.doc("2").is_none());
    }

    #[test]
    fn test_fan_out_with_no_associations_is_skipped() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store, sample_records());

        pipeline.queue().push(SyncEntry::for_tag(999, 1000));
        let result = pipeline.process_batch(100).unwrap();

        assert_eq!(result.processed, 0);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_store_failure_recorded_and_batch_continues() {
        let store = Arc::new(MemoryStore::failing());
        let mut pipeline = build_pipeline(store, sample_records());

        pipeline.queue().push(SyncEntry::for_record(1, 1000));
        pipeline.queue().push(SyncEntry::for_record(999, 2000));
        let result = pipeline.process_batch(100).unwrap();

        assert_eq!(result.errors, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.last_sequence, Some(2));
    }

    #[test]
    fn test_store_failure_aborts_without_continue_on_error() {
        let store = Arc::new(MemoryStore::failing());
        let mut pipeline = build_pipeline(store, sample_records());
        pipeline.config.continue_on_error = false;

        pipeline.queue().push(SyncEntry::for_record(1, 1000));
        let err = pipeline.process_batch(100).unwrap_err();
        assert!(matches!(err, SyncError::Store(_)));
    }

    #[test]
    fn test_checkpoint_advances_and_cleanup() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store, sample_records());

        for id in [1, 2, 3] {
            pipeline.queue().push(SyncEntry::for_record(id, 1000));
        }

        pipeline.process_batch(100).unwrap();
        assert_eq!(pipeline.checkpoint().last_sequence, 3);

        let deleted = pipeline.cleanup_queue();
        assert_eq!(deleted, 3);
        assert!(pipeline.queue().is_empty());

        // Nothing left to process
        let result = pipeline.process_batch(100).unwrap();
        assert!(result.last_sequence.is_none());
    }

    #[test]
    fn test_process_until_caught_up_batches() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store.clone(), sample_records());
        pipeline.config.batch_size = 2;

        for _ in 0..3 {
            for id in [1, 2, 3] {
                pipeline.queue().push(SyncEntry::for_record(id, 1000));
            }
        }

        let result = pipeline.process_until_caught_up(100).unwrap();
        assert_eq!(result.processed, 9);
        assert_eq!(result.last_sequence, Some(9));
        assert_eq!(store.doc_count(), 3);
    }

    #[test]
    fn test_ensure_indexes_creates_registered() {
        let store = Arc::new(MemoryStore::default());
        let pipeline = build_pipeline(store.clone(), Vec::new());

        pipeline.ensure_indexes().unwrap();
        assert!(store.indexes.lock().unwrap().contains("documents"));
    }

    #[test]
    fn test_restore_checkpoint_skips_consumed_entries() {
        let store = Arc::new(MemoryStore::default());
        let mut pipeline = build_pipeline(store, sample_records());

        pipeline.queue().push(SyncEntry::for_record(1, 1000));
        pipeline.queue().push(SyncEntry::for_record(2, 2000));

        pipeline.restore_checkpoint(SyncCheckpoint::with_sequence(1));
        let result = pipeline.process_batch(100).unwrap();

        // Only the second entry is consumed
        assert_eq!(result.processed, 1);
        assert_eq!(result.last_sequence, Some(2));
    }
}
