//! Fixed-size worker pool that classifies every enumerated file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tokio::sync::broadcast;
use tracing::{info, warn};

use filesweep_core::{
    LinkInspector, ScanConfig, ScanError, ScanOutcome, ScanStats, ScanWarning,
};

use crate::classify::{Classifier, Inspection};
use crate::enumerate::FileEnumerator;
use crate::owner::{OwnerResolver, SystemOwnerResolver};
use crate::progress::ScanProgress;
use crate::sink::RecordSink;

/// Files between two progress broadcasts.
pub const PROGRESS_INTERVAL: u64 = 100;

/// Scanner running one classification task per file on a bounded pool.
pub struct Scanner {
    owners: Arc<dyn OwnerResolver>,
    inspector: Arc<dyn LinkInspector>,
    progress_tx: broadcast::Sender<ScanProgress>,
    cancelled: Arc<AtomicBool>,
}

impl Scanner {
    /// Create a scanner using the system owner lookup and the given link
    /// inspector.
    pub fn new(inspector: impl LinkInspector + 'static) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            owners: Arc::new(SystemOwnerResolver::new()),
            inspector: Arc::new(inspector),
            progress_tx,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the owner lookup.
    pub fn with_owner_resolver(mut self, owners: impl OwnerResolver + 'static) -> Self {
        self.owners = Arc::new(owners);
        self
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Flag that stops the scan when set. Files already being processed
    /// finish; the rest are skipped and the scan reports
    /// [`ScanError::Interrupted`].
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Scan the configured root.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
        let start = Instant::now();

        if config.concurrency == 0 {
            return Err(ScanError::InvalidConfig {
                message: "concurrency must be at least 1".to_string(),
            });
        }

        let enumerator = FileEnumerator::new(config)?;
        let root_path = enumerator.root().to_path_buf();
        info!(
            root = %root_path.display(),
            concurrency = config.concurrency,
            "scanning"
        );

        let sink = RecordSink::new();
        let mut enumeration_errors = 0u64;
        let mut paths: Vec<PathBuf> = Vec::new();
        for item in enumerator.files() {
            match item {
                Ok(path) => paths.push(path),
                Err(warning) => {
                    warn!(path = %warning.path.display(), error = %warning.message, "cannot read directory");
                    enumeration_errors += 1;
                    sink.warn(warning);
                }
            }
        }
        let files_enumerated = paths.len() as u64;
        info!(files = files_enumerated, "enumeration finished");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.concurrency)
            .thread_name(|i| format!("filesweep-worker-{i}"))
            .build()
            .map_err(|e| ScanError::Pool {
                message: e.to_string(),
            })?;

        let counters = Counters::default();
        let interrupted = AtomicBool::new(false);
        let deadline = config.deadline.map(|d| start + d);
        let classifier = Classifier::new(config, self.owners.as_ref(), self.inspector.as_ref());

        pool.install(|| {
            paths.par_iter().for_each(|path| {
                if self.should_stop(&interrupted, deadline) {
                    return;
                }

                match classifier.classify(path) {
                    Ok(classified) => {
                        match classified.inspection {
                            Inspection::Skipped => {}
                            Inspection::Completed => {
                                counters.inspections.fetch_add(1, Ordering::Relaxed);
                            }
                            Inspection::Failed(ref err) => {
                                counters.inspections.fetch_add(1, Ordering::Relaxed);
                                counters.inspection_failures.fetch_add(1, Ordering::Relaxed);
                                sink.warn(ScanWarning::from(err));
                            }
                        }
                        counters.bytes.fetch_add(classified.bytes, Ordering::Relaxed);
                        counters.records.fetch_add(1, Ordering::Relaxed);
                        sink.push(classified.record);
                    }
                    Err(err) => {
                        warn!(path = %err.path().display(), error = %err, "skipping file");
                        counters.dropped.fetch_add(1, Ordering::Relaxed);
                        sink.warn(ScanWarning::from(&err));
                    }
                }

                let processed = counters.processed.fetch_add(1, Ordering::Relaxed) + 1;
                if processed % PROGRESS_INTERVAL == 0 {
                    self.publish(&counters, files_enumerated, path, start);
                }
            });
        });

        let processed = counters.processed.load(Ordering::Relaxed);
        if interrupted.load(Ordering::Relaxed) || self.cancelled.load(Ordering::Relaxed) {
            warn!(processed, total = files_enumerated, "scan interrupted");
            return Err(ScanError::Interrupted { processed });
        }

        self.publish(&counters, files_enumerated, &root_path, start);

        let (records, warnings) = sink.into_parts();
        let stats = ScanStats {
            files_enumerated,
            records: counters.records.load(Ordering::Relaxed),
            files_dropped: counters.dropped.load(Ordering::Relaxed),
            enumeration_errors,
            inspections: counters.inspections.load(Ordering::Relaxed),
            inspection_failures: counters.inspection_failures.load(Ordering::Relaxed),
            total_bytes: counters.bytes.load(Ordering::Relaxed),
        };

        let scan_duration = start.elapsed();
        info!(
            records = stats.records,
            dropped = stats.files_dropped,
            elapsed_ms = scan_duration.as_millis() as u64,
            "scan finished"
        );

        Ok(ScanOutcome::new(
            root_path,
            records,
            warnings,
            stats,
            config.clone(),
            scan_duration,
        ))
    }

    /// Check the cancel flag and the deadline before starting a task.
    fn should_stop(&self, interrupted: &AtomicBool, deadline: Option<Instant>) -> bool {
        if self.cancelled.load(Ordering::Relaxed) || interrupted.load(Ordering::Relaxed) {
            return true;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            interrupted.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    fn publish(&self, counters: &Counters, files_total: u64, path: &Path, start: Instant) {
        let _ = self.progress_tx.send(ScanProgress {
            files_processed: counters.processed.load(Ordering::Relaxed),
            files_total,
            records: counters.records.load(Ordering::Relaxed),
            files_dropped: counters.dropped.load(Ordering::Relaxed),
            inspections: counters.inspections.load(Ordering::Relaxed),
            current_path: path.to_path_buf(),
            elapsed: start.elapsed(),
        });
    }
}

/// Counters shared by the workers of one scan.
#[derive(Default)]
struct Counters {
    processed: AtomicU64,
    records: AtomicU64,
    dropped: AtomicU64,
    inspections: AtomicU64,
    inspection_failures: AtomicU64,
    bytes: AtomicU64,
}
