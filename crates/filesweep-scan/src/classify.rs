//! The per-file task body: metadata, classification flags and the optional
//! link inspection.

use std::path::Path;

use tracing::{debug, warn};

use filesweep_core::{
    FileRecord, InspectError, LinkInspector, RecordError, ScanConfig, extension_of, is_active,
    size_mb,
};

use crate::owner::OwnerResolver;

/// What happened to the link inspection step for one file.
#[derive(Debug)]
pub enum Inspection {
    /// The file was not an active xlsx workbook; the inspector was not called.
    Skipped,
    /// The inspector answered.
    Completed,
    /// The inspector failed; the record reports no links.
    Failed(InspectError),
}

/// A classified file, ready for the sink.
#[derive(Debug)]
pub struct Classified {
    pub record: FileRecord,
    /// Raw size in bytes.
    pub bytes: u64,
    pub inspection: Inspection,
}

/// Builds one [`FileRecord`] per file from immutable configuration.
pub struct Classifier<'a> {
    config: &'a ScanConfig,
    owners: &'a dyn OwnerResolver,
    inspector: &'a dyn LinkInspector,
}

impl<'a> Classifier<'a> {
    /// Create a classifier borrowing the run's configuration and collaborators.
    pub fn new(
        config: &'a ScanConfig,
        owners: &'a dyn OwnerResolver,
        inspector: &'a dyn LinkInspector,
    ) -> Self {
        Self {
            config,
            owners,
            inspector,
        }
    }

    /// Classify a single file.
    ///
    /// Metadata, access time and owner failures are returned as errors and the file is
    /// dropped by the caller. Inspection failures are absorbed.
    pub fn classify(&self, path: &Path) -> Result<Classified, RecordError> {
        let metadata = std::fs::metadata(path).map_err(|source| RecordError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;

        let bytes = metadata.len();
        let size_mb = size_mb(bytes);

        let last_access = match metadata.accessed() {
            Ok(time) => time,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "no access time, using modified");
                metadata.modified().map_err(|source| RecordError::Metadata {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };
        let last_access_time =
            FileRecord::timestamp(last_access).ok_or_else(|| RecordError::AccessTime {
                path: path.to_path_buf(),
            })?;
        let active = is_active(
            last_access,
            self.config.reference_time,
            self.config.expiration_months,
        );

        let extension = extension_of(path);
        let unwanted = self.config.is_unwanted(&extension);

        let owner = self.owners.owner(path, &metadata)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut record = FileRecord {
            full_path: path.to_path_buf(),
            name: name.into(),
            size_mb,
            owner,
            last_access_time,
            extension: extension.into(),
            active,
            unwanted,
            contains_links: false,
        };

        let inspection = if record.wants_inspection() {
            match self.inspector.contains_links(path) {
                Ok(found) => {
                    record.contains_links = found;
                    Inspection::Completed
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "link inspection failed, assuming no links");
                    Inspection::Failed(err)
                }
            }
        } else {
            Inspection::Skipped
        };

        debug!(
            path = %path.display(),
            active = record.active,
            unwanted = record.unwanted,
            contains_links = record.contains_links,
            "classified"
        );

        Ok(Classified {
            record,
            bytes,
            inspection,
        })
    }
}
