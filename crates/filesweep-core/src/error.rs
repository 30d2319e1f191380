//! Error types for scanning operations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root path does not exist.
    #[error("Path not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error while checking the root.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The worker pool could not be started.
    #[error("Failed to start worker pool: {message}")]
    Pool { message: String },

    /// The scan was cancelled or ran past its deadline.
    #[error("Scan interrupted after {processed} files")]
    Interrupted { processed: u64 },
}

impl ScanError {
    /// Classify an I/O error raised while resolving the root path.
    pub fn root(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::RootNotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// A failure processing one file. The file is dropped from the output.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The file's metadata could not be read.
    #[error("cannot read metadata of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file's access time cannot be represented as a calendar date.
    #[error("access time of {path} is out of range")]
    AccessTime { path: PathBuf },

    /// The file's owner could not be resolved.
    #[error("cannot resolve owner of {path}: {message}")]
    Owner { path: PathBuf, message: String },
}

impl RecordError {
    /// Path of the file that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Metadata { path, .. } | Self::AccessTime { path } | Self::Owner { path, .. } => {
                path
            }
        }
    }
}

/// A failure inspecting a spreadsheet for hyperlinks.
///
/// Never fatal to the file: the record is kept with `ContainsLinks = false`.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The document could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a readable spreadsheet archive.
    #[error("malformed spreadsheet {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Inspection did not finish in time.
    #[error("inspection of {path} timed out after {timeout:?}")]
    Timeout { path: PathBuf, timeout: Duration },

    /// The inspecting thread died before reporting.
    #[error("inspection of {path} aborted")]
    Aborted { path: PathBuf },

    /// Too many inspections, stalled ones included, are still running.
    #[error("inspection of {path} skipped: {limit} inspections still running")]
    Saturated { path: PathBuf, limit: usize },
}

impl InspectError {
    /// Path of the document that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Archive { path, .. }
            | Self::Timeout { path, .. }
            | Self::Aborted { path }
            | Self::Saturated { path, .. } => path,
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A directory could not be read during enumeration.
    ReadError,
    /// Error reading file metadata; file dropped.
    MetadataError,
    /// Owner lookup failed; file dropped.
    OwnerError,
    /// Link inspection failed; file kept without links.
    InspectionFailed,
    /// Link inspection timed out; file kept without links.
    InspectionTimeout,
}

impl WarningKind {
    /// Whether the affected file is missing from the output.
    pub fn drops_file(&self) -> bool {
        matches!(self, Self::MetadataError | Self::OwnerError)
    }
}

/// Non-fatal warning encountered during scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::new(path, message, WarningKind::ReadError)
    }
}

impl From<&RecordError> for ScanWarning {
    fn from(err: &RecordError) -> Self {
        let kind = match err {
            RecordError::Metadata { .. } | RecordError::AccessTime { .. } => {
                WarningKind::MetadataError
            }
            RecordError::Owner { .. } => WarningKind::OwnerError,
        };
        Self::new(err.path(), err.to_string(), kind)
    }
}

impl From<&InspectError> for ScanWarning {
    fn from(err: &InspectError) -> Self {
        let kind = match err {
            InspectError::Timeout { .. } => WarningKind::InspectionTimeout,
            _ => WarningKind::InspectionFailed,
        };
        Self::new(err.path(), err.to_string(), kind)
    }
}
