//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Files handed to workers and finished, successfully or not.
    pub files_processed: u64,
    /// Files the enumerator found.
    pub files_total: u64,
    /// Records written to the sink so far.
    pub records: u64,
    /// Files dropped after a per-file error.
    pub files_dropped: u64,
    /// Spreadsheets inspected for links so far.
    pub inspections: u64,
    /// Most recently finished path.
    pub current_path: PathBuf,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_processed as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Fraction of enumerated files processed, in `0.0..=1.0`.
    pub fn fraction_done(&self) -> f64 {
        if self.files_total == 0 {
            1.0
        } else {
            self.files_processed as f64 / self.files_total as f64
        }
    }

    /// Whether every enumerated file has been processed.
    pub fn is_complete(&self) -> bool {
        self.files_processed >= self.files_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(files_processed: u64, files_total: u64) -> ScanProgress {
        ScanProgress {
            files_processed,
            files_total,
            records: files_processed,
            files_dropped: 0,
            inspections: 0,
            current_path: PathBuf::new(),
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_rates() {
        let mut progress = snapshot(0, 200);
        assert_eq!(progress.files_per_second(), 0.0);
        assert!(!progress.is_complete());

        progress.files_processed = 100;
        progress.elapsed = Duration::from_secs(2);
        assert_eq!(progress.files_per_second(), 50.0);
        assert_eq!(progress.fraction_done(), 0.5);
    }

    #[test]
    fn test_empty_scan_is_complete() {
        let progress = snapshot(0, 0);
        assert!(progress.is_complete());
        assert_eq!(progress.fraction_done(), 1.0);
    }
}
