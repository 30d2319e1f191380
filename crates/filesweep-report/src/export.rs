//! Tabular export of scan records.
//!
//! The whole document is rendered in memory, written to a temporary file next
//! to the destination and then renamed over it. A failed export leaves any
//! previous file at the destination untouched.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use strum::{Display, EnumIter, IntoEnumIterator};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use filesweep_core::FileRecord;

/// Output column, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Column {
    FullPath,
    Name,
    #[strum(to_string = "SizeMB")]
    SizeMb,
    Owner,
    LastAccessTime,
    Extension,
    Active,
    Unwanted,
    ContainsLinks,
}

impl Column {
    /// Render one cell of `record`.
    pub fn render(self, record: &FileRecord) -> String {
        match self {
            Self::FullPath => record.full_path.to_string_lossy().into_owned(),
            Self::Name => record.name.to_string(),
            Self::SizeMb => format!("{:.2}", record.size_mb),
            Self::Owner => record.owner.to_string(),
            Self::LastAccessTime => render_time(&record.last_access_time),
            Self::Extension => record.extension.to_string(),
            Self::Active => render_bool(record.active).to_string(),
            Self::Unwanted => render_bool(record.unwanted).to_string(),
            Self::ContainsLinks => render_bool(record.contains_links).to_string(),
        }
    }
}

/// Boolean cell text.
pub fn render_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Timestamp cell text: RFC 3339, UTC, whole seconds.
pub fn render_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    #[default]
    #[strum(to_string = "csv")]
    Csv,
    /// A pretty-printed JSON array of objects.
    #[strum(to_string = "json")]
    Json,
}

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("output directory does not exist: {path}")]
    DirectoryMissing { path: PathBuf },

    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes records in one [`ExportFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter {
    format: ExportFormat,
}

impl Exporter {
    /// Create an exporter for `format`.
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// Render the full document.
    pub fn render(&self, records: &[FileRecord]) -> Result<Vec<u8>, ExportError> {
        match self.format {
            ExportFormat::Csv => render_csv(records),
            ExportFormat::Json => {
                let mut bytes = serde_json::to_vec_pretty(records)?;
                bytes.push(b'\n');
                Ok(bytes)
            }
        }
    }

    /// Write `records` to `dest`, replacing any existing file.
    ///
    /// The parent directory must already exist; it is never created.
    pub fn write(&self, records: &[FileRecord], dest: impl AsRef<Path>) -> Result<(), ExportError> {
        let dest = dest.as_ref();
        let dir = output_dir(dest);
        if !dir.is_dir() {
            return Err(ExportError::DirectoryMissing { path: dir });
        }

        let bytes = self.render(records)?;
        debug!(dest = %dest.display(), bytes = bytes.len(), format = %self.format, "rendered export");

        let io_err = |source| ExportError::Io {
            path: dest.to_path_buf(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(dest).map_err(|e| ExportError::Persist {
            path: dest.to_path_buf(),
            source: e.error,
        })?;

        info!(dest = %dest.display(), rows = records.len(), "export written");
        Ok(())
    }
}

fn render_csv(records: &[FileRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(Column::iter().map(|c| c.to_string()))?;
    for record in records {
        writer.write_record(Column::iter().map(|c| c.render(record)))?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

/// Directory the destination will live in. A bare file name means the
/// working directory.
fn output_dir(dest: &Path) -> PathBuf {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
