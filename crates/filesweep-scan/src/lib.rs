//! File metadata scanning engine for filesweep.
//!
//! This crate walks a directory tree and turns every regular file into a
//! [`FileRecord`] using a fixed-size worker pool.
//!
//! # Overview
//!
//! - **Enumeration** via jwalk, failing fast on a missing root
//! - **Bounded fan-out** on a rayon pool of exactly `concurrency` threads
//! - **Isolated failures**: a file that cannot be classified is logged and
//!   dropped, never aborting its siblings
//! - **Progress updates** via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use filesweep_scan::{InspectError, LinkInspector, ScanConfig, Scanner};
//!
//! struct NoLinks;
//!
//! impl LinkInspector for NoLinks {
//!     fn contains_links(&self, _path: &Path) -> Result<bool, InspectError> {
//!         Ok(false)
//!     }
//! }
//!
//! let config = ScanConfig::new("/srv/share");
//! let outcome = Scanner::new(NoLinks).scan(&config).unwrap();
//!
//! println!("{} records", outcome.records.len());
//! ```

mod classify;
mod enumerate;
mod owner;
mod progress;
mod scanner;
mod sink;

pub use classify::{Classified, Classifier, Inspection};
pub use enumerate::FileEnumerator;
pub use owner::{OwnerResolver, SystemOwnerResolver};
pub use progress::ScanProgress;
pub use scanner::{PROGRESS_INTERVAL, Scanner};
pub use sink::RecordSink;

// Re-export core types for convenience
pub use filesweep_core::{
    FileRecord, InspectError, LinkInspector, RecordError, ScanConfig, ScanError, ScanOutcome,
    ScanStats, ScanWarning, WarningKind,
};
