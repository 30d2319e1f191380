//! Core types and traits for filesweep.
//!
//! This crate provides the data structures shared by the scanner, the link
//! inspector and the report writer: the per-file [`FileRecord`], the scan
//! configuration, the error taxonomy and the [`LinkInspector`] seam.

mod config;
mod error;
mod inspect;
mod outcome;
mod record;

pub use config::{ScanConfig, ScanConfigBuilder, default_unwanted_extensions, normalize_extension};
pub use error::{InspectError, RecordError, ScanError, ScanWarning, WarningKind};
pub use inspect::LinkInspector;
pub use outcome::{ScanOutcome, ScanStats};
pub use record::{
    BYTES_PER_MB, DAYS_PER_MONTH, DedupKey, FileRecord, XLSX_EXTENSION, expiration_window,
    extension_of, is_active, is_xlsx, size_mb,
};
