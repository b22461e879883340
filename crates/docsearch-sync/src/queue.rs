//! Sequence-numbered sync queue.
//!
//! Producers push change events as data mutates; the pipeline consumes
//! them in sequence order with bounded batches. Modeling fan-out through
//! an explicit queue keeps ordering and backpressure controllable
//! instead of hiding them in mutation hooks.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use docsearch_types::SyncEntry;

struct QueueInner {
    entries: VecDeque<(u64, SyncEntry)>,
    next_sequence: u64,
}

/// In-process sync queue.
///
/// Sequence numbers start at 1 and never repeat; a checkpoint of 0 means
/// nothing has been consumed yet.
pub struct SyncQueue {
    inner: Mutex<QueueInner>,
}

impl SyncQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                entries: VecDeque::new(),
                next_sequence: 1,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueInner> {
        // a poisoned lock still holds a valid queue
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry, returning its assigned sequence number.
    pub fn push(&self, entry: SyncEntry) -> u64 {
        let mut inner = self.lock();
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.entries.push_back((sequence, entry));
        debug!(sequence, "Enqueued sync entry");
        sequence
    }

    /// Entries with sequence greater than `sequence`, up to `limit`.
    pub fn entries_after(&self, sequence: u64, limit: usize) -> Vec<(u64, SyncEntry)> {
        let inner = self.lock();
        inner
            .entries
            .iter()
            .filter(|(seq, _)| *seq > sequence)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Drop entries with sequence at or below `sequence`. Returns how
    /// many were removed.
    pub fn delete_up_to(&self, sequence: u64) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|(seq, _)| *seq > sequence);
        let deleted = before - inner.entries.len();
        if deleted > 0 {
            debug!(sequence, deleted, "Cleaned up sync entries");
        }
        deleted
    }

    /// Number of entries currently queued.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

impl Default for SyncQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_sequences() {
        let queue = SyncQueue::new();
        assert_eq!(queue.push(SyncEntry::for_record(1, 100)), 1);
        assert_eq!(queue.push(SyncEntry::for_record(2, 200)), 2);
        assert_eq!(queue.push(SyncEntry::for_delete(1, 300)), 3);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_entries_after() {
        let queue = SyncQueue::new();
        for i in 0..5 {
            queue.push(SyncEntry::for_record(i, i * 1000));
        }

        let entries = queue.entries_after(2, 10);
        let sequences: Vec<u64> = entries.iter().map(|(seq, _)| *seq).collect();
        assert_eq!(sequences, vec![3, 4, 5]);

        let limited = queue.entries_after(0, 2);
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].0, 1);
    }

    #[test]
    fn test_delete_up_to() {
        let queue = SyncQueue::new();
        for i in 0..5 {
            queue.push(SyncEntry::for_record(i, 0));
        }

        assert_eq!(queue.delete_up_to(3), 3);
        assert_eq!(queue.len(), 2);
        // entries stay gone; sequences keep increasing
        assert_eq!(queue.push(SyncEntry::for_record(9, 0)), 6);
    }

    #[test]
    fn test_empty_queue() {
        let queue = SyncQueue::new();
        assert!(queue.is_empty());
        assert!(queue.entries_after(0, 10).is_empty());
        assert_eq!(queue.delete_up_to(100), 0);
    }
}
