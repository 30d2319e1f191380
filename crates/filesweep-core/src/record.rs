//! The per-file inventory record and the classification rules behind it.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Bytes in one reported megabyte.
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Length of a month for the activity window. Not calendar-accurate.
pub const DAYS_PER_MONTH: u64 = 30;

/// Extension of the spreadsheets that get inspected for hyperlinks.
pub const XLSX_EXTENSION: &str = ".xlsx";

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Size in megabytes, rounded to two decimal places.
pub fn size_mb(bytes: u64) -> f64 {
    ((bytes as f64 / BYTES_PER_MB) * 100.0).round() / 100.0
}

/// Length of an activity window of `months` uniform months.
pub fn expiration_window(months: u32) -> Duration {
    Duration::from_secs(u64::from(months) * DAYS_PER_MONTH * SECS_PER_DAY)
}

/// Whether a file last accessed at `last_access` is still active at `now`.
///
/// The comparison is strict: a file exactly one window old is inactive.
/// Access times in the future count as age zero.
pub fn is_active(last_access: SystemTime, now: SystemTime, months: u32) -> bool {
    match now.duration_since(last_access) {
        Ok(age) => age < expiration_window(months),
        Err(_) => true,
    }
}

/// Extension of `path` with a leading dot and its original case, or an
/// empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Whether an extension names an xlsx workbook (case-insensitive).
pub fn is_xlsx(extension: &str) -> bool {
    extension.eq_ignore_ascii_case(XLSX_EXTENSION)
}

/// One inventoried file.
///
/// Built once inside a worker task and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileRecord {
    /// Full path, unique per enumerated file.
    pub full_path: PathBuf,
    /// Base file name.
    pub name: CompactString,
    /// Size in megabytes, rounded to two decimals.
    #[serde(rename = "SizeMB")]
    pub size_mb: f64,
    /// Resolved owner principal.
    pub owner: CompactString,
    /// Last access time, truncated to whole seconds.
    pub last_access_time: DateTime<Utc>,
    /// Extension with leading dot, original case.
    pub extension: CompactString,
    /// Accessed within the expiration window.
    pub active: bool,
    /// Extension is on the unwanted list.
    pub unwanted: bool,
    /// An active xlsx workbook with at least one hyperlink.
    pub contains_links: bool,
}

impl FileRecord {
    /// Convert a filesystem timestamp to the record's representation,
    /// rounded down to the whole second.
    ///
    /// Returns `None` for times chrono cannot represent. Some filesystems
    /// store access times far outside that range.
    pub fn timestamp(time: SystemTime) -> Option<DateTime<Utc>> {
        let secs = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_secs()).ok()?,
            Err(err) => {
                let before = err.duration();
                let secs = i64::try_from(before.as_secs()).ok()?;
                if before.subsec_nanos() > 0 { -secs - 1 } else { -secs }
            }
        };
        DateTime::from_timestamp(secs, 0)
    }

    /// Key used to collapse presumed duplicates.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            owner: self.owner.clone(),
            name: self.name.clone(),
            size_hundredths: (self.size_mb * 100.0).round() as u64,
        }
    }

    /// Whether this record is eligible for link inspection.
    pub fn wants_inspection(&self) -> bool {
        self.active && is_xlsx(&self.extension)
    }
}

/// Composite `(Owner, Name, SizeMB)` identity.
///
/// Two different files with the same owner, name and rounded size share a
/// key; that collapse is intended.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub owner: CompactString,
    pub name: CompactString,
    /// SizeMB scaled to an integer so it can be hashed.
    pub size_hundredths: u64,
}
