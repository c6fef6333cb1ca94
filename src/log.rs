use crate::record::LineRecord;
use std::sync::{Arc, Mutex};

/// The append-only sequence of every line record received across all connections.
///
/// This mirrors the legacy full-history feed: no per-connection grouping, just every
/// record in the order its append won the lock. No other component reads it; it is
/// retained as the hook point for future cross-book analysis. Each record here is the
/// same allocation linked into its owning [`BookEntry`](crate::BookEntry).
#[derive(Debug)]
pub struct SharedLog {
    records: Mutex<Vec<Arc<LineRecord>>>,
}

impl SharedLog {
    /// creates an empty log
    pub fn new() -> SharedLog {
        SharedLog {
            records: Mutex::new(Vec::new()),
        }
    }

    /// appends one record, holding the log lock only for the push
    pub fn append(&self, record: Arc<LineRecord>) {
        self.lock_records().push(record);
    }

    /// the number of records ingested so far
    pub fn len(&self) -> usize {
        self.lock_records().len()
    }

    /// whether nothing has been ingested yet
    pub fn is_empty(&self) -> bool {
        self.lock_records().is_empty()
    }

    /// a point-in-time copy of the record handles, in append order
    pub fn snapshot(&self) -> Vec<Arc<LineRecord>> {
        self.lock_records().clone()
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, Vec<Arc<LineRecord>>> {
        self.records.lock().expect("shared log lock poisoned")
    }
}

impl Default for SharedLog {
    fn default() -> SharedLog {
        SharedLog::new()
    }
}
