//! Collapse of presumed-duplicate records.
//!
//! Records are grouped by `(Owner, Name, SizeMB)` and the first one seen in
//! collection order survives. Copies of one file in different directories
//! collapse, and so do unrelated files that happen to share owner, name and
//! rounded size. With more than one worker the collection order, and thus
//! which path survives, varies from run to run.

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use filesweep_core::FileRecord;

/// Result of deduplication.
#[derive(Debug, Clone, Serialize)]
pub struct DedupReport {
    /// Surviving records, in their original relative order.
    pub records: Vec<FileRecord>,
    /// Number of records dropped as duplicates.
    pub removed: usize,
}

impl DedupReport {
    /// Check if anything was collapsed.
    pub fn has_duplicates(&self) -> bool {
        self.removed > 0
    }
}

/// First-seen-wins deduplicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator;

impl Deduplicator {
    /// Create a new deduplicator.
    pub fn new() -> Self {
        Self
    }

    /// Keep the first record per dedup key.
    pub fn dedup(&self, records: Vec<FileRecord>) -> DedupReport {
        let before = records.len();
        let records: Vec<FileRecord> = records
            .into_iter()
            .unique_by(FileRecord::dedup_key)
            .collect();
        let removed = before - records.len();

        debug!(before, after = records.len(), removed, "deduplicated");

        DedupReport { records, removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn record(path: &str, owner: &str, size_mb: f64) -> FileRecord {
        let path = PathBuf::from(path);
        FileRecord {
            name: path.file_name().unwrap().to_string_lossy().into_owned().into(),
            full_path: path,
            size_mb,
            owner: owner.into(),
            last_access_time: FileRecord::timestamp(SystemTime::now()).unwrap(),
            extension: ".txt".into(),
            active: true,
            unwanted: false,
            contains_links: false,
        }
    }

    #[test]
    fn test_first_seen_wins() {
        let records = vec![
            record("/b/notes.txt", "alice", 0.5),
            record("/a/notes.txt", "alice", 0.5),
            record("/c/notes.txt", "alice", 0.5),
        ];

        let report = Deduplicator::new().dedup(records);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].full_path, PathBuf::from("/b/notes.txt"));
        assert_eq!(report.removed, 2);
        assert!(report.has_duplicates());
    }

    #[test]
    fn test_distinct_keys_survive_in_order() {
        let records = vec![
            record("/a/notes.txt", "alice", 0.5),
            record("/a/notes.txt.bak", "alice", 0.5),
            record("/b/notes.txt", "bob", 0.5),
            record("/c/notes.txt", "alice", 0.51),
        ];

        let report = Deduplicator::new().dedup(records.clone());
        assert_eq!(report.records, records);
        assert!(!report.has_duplicates());
    }

    #[test]
    fn test_empty_input() {
        let report = Deduplicator::new().dedup(Vec::new());
        assert!(report.records.is_empty());
        assert_eq!(report.removed, 0);
    }
}
