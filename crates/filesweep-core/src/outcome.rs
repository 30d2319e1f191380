//! Scan results and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::ScanWarning;
use crate::record::FileRecord;

/// Counters collected while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Regular files produced by the enumerator.
    pub files_enumerated: u64,
    /// Records written to the sink.
    pub records: u64,
    /// Files dropped after a per-file error.
    pub files_dropped: u64,
    /// Directories the enumerator could not read.
    pub enumeration_errors: u64,
    /// Spreadsheets handed to the link inspector.
    pub inspections: u64,
    /// Inspections that failed or timed out.
    pub inspection_failures: u64,
    /// Total size of recorded files in bytes.
    pub total_bytes: u64,
}

/// Everything a scan produced, in sink order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Canonical root that was scanned.
    pub root_path: PathBuf,

    /// Records in the order workers completed them.
    pub records: Vec<FileRecord>,

    /// Recoverable problems hit along the way.
    pub warnings: Vec<ScanWarning>,

    /// Summary counters.
    pub stats: ScanStats,

    /// Configuration used.
    pub config: ScanConfig,

    /// When the scan finished.
    pub scanned_at: SystemTime,

    /// Wall-clock duration of the scan.
    pub scan_duration: Duration,
}

impl ScanOutcome {
    /// Bundle up a finished scan.
    pub fn new(
        root_path: PathBuf,
        records: Vec<FileRecord>,
        warnings: Vec<ScanWarning>,
        stats: ScanStats,
        config: ScanConfig,
        scan_duration: Duration,
    ) -> Self {
        Self {
            root_path,
            records,
            warnings,
            stats,
            config,
            scanned_at: SystemTime::now(),
            scan_duration,
        }
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings whose file is absent from `records`.
    pub fn dropped_files(&self) -> impl Iterator<Item = &ScanWarning> {
        self.warnings.iter().filter(|w| w.kind.drops_file())
    }
}
