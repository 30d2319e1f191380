//! End-of-run counts.

use serde::Serialize;

use filesweep_core::FileRecord;

/// Aggregate view of the exported records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanSummary {
    /// Rows in the exported document.
    pub rows: usize,
    /// Rows flagged active.
    pub active: usize,
    /// Rows flagged unwanted.
    pub unwanted: usize,
    /// Rows flagged as containing links.
    pub with_links: usize,
    /// Records collapsed as duplicates before export.
    pub duplicates_removed: usize,
    /// Sum of SizeMB over exported rows.
    pub total_size_mb: f64,
}

impl ScanSummary {
    /// Summarize `records` after `duplicates_removed` were collapsed.
    pub fn from_records(records: &[FileRecord], duplicates_removed: usize) -> Self {
        records.iter().fold(
            Self {
                duplicates_removed,
                ..Self::default()
            },
            |mut acc, record| {
                acc.rows += 1;
                acc.active += usize::from(record.active);
                acc.unwanted += usize::from(record.unwanted);
                acc.with_links += usize::from(record.contains_links);
                acc.total_size_mb += record.size_mb;
                acc
            },
        )
    }

    /// Rows not accessed within the expiration window.
    pub fn inactive(&self) -> usize {
        self.rows - self.active
    }
}
