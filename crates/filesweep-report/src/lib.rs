//! Reduction and output for filesweep scans.
//!
//! - **Deduplication** - collapse records sharing `(Owner, Name, SizeMB)`,
//!   keeping the first one collected
//! - **Export** - CSV or JSON, written atomically over the destination
//! - **Summary** - counts for the end-of-run report
//!
//! ```rust,ignore
//! use filesweep_report::{Deduplicator, ExportFormat, Exporter};
//!
//! let deduped = Deduplicator::new().dedup(outcome.records);
//! Exporter::new(ExportFormat::Csv).write(&deduped.records, "inventory.csv")?;
//! ```

mod dedup;
mod export;
mod summary;

pub use dedup::{DedupReport, Deduplicator};
pub use export::{Column, ExportError, ExportFormat, Exporter, render_bool, render_time};
pub use summary::ScanSummary;

// Re-export core types
pub use filesweep_core::{DedupKey, FileRecord};
