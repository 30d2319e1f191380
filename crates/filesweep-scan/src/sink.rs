//! Shared, append-only collection of worker results.

use std::sync::{Mutex, MutexGuard, PoisonError};

use filesweep_core::{FileRecord, ScanWarning};

/// Thread-safe sink that workers append finished records and warnings to.
///
/// Records keep the order in which workers pushed them; that order is what
/// "first seen" means during deduplication.
#[derive(Debug, Default)]
pub struct RecordSink {
    records: Mutex<Vec<FileRecord>>,
    warnings: Mutex<Vec<ScanWarning>>,
}

impl RecordSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished record.
    pub fn push(&self, record: FileRecord) {
        lock(&self.records).push(record);
    }

    /// Append a warning.
    pub fn warn(&self, warning: ScanWarning) {
        lock(&self.warnings).push(warning);
    }

    /// Consume the sink once all workers have been joined.
    pub fn into_parts(self) -> (Vec<FileRecord>, Vec<ScanWarning>) {
        let records = self
            .records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let warnings = self
            .warnings
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (records, warnings)
    }
}

// A worker that panicked mid-push cannot leave a half-written Vec behind, so
// the data behind a poisoned lock is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
