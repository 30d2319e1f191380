//! Scan configuration types.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::record::expiration_window;

/// Configuration for a scan run.
///
/// Every value here is read-only once the scan starts; workers share the
/// config by reference without locking.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Activity threshold, in uniform 30-day months.
    #[builder(default = "12")]
    #[serde(default = "default_expiration_months")]
    pub expiration_months: u32,

    /// Extensions flagged as unwanted (case-insensitive, leading dot optional).
    #[builder(default = "default_unwanted_extensions()")]
    #[serde(default = "default_unwanted_extensions")]
    pub unwanted_extensions: Vec<String>,

    /// Number of worker threads processing files.
    #[builder(default = "4")]
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Upper bound on a single spreadsheet inspection.
    #[builder(default = "Duration::from_secs(30)")]
    #[serde(default = "default_link_timeout")]
    pub link_timeout: Duration,

    /// Overall time limit for the scan (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub deadline: Option<Duration>,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// The "now" all access-time comparisons are made against.
    #[builder(default = "SystemTime::now()")]
    #[serde(default = "SystemTime::now")]
    pub reference_time: SystemTime,
}

/// The extensions flagged when none are configured.
pub fn default_unwanted_extensions() -> Vec<String> {
    vec![".tmp".to_string(), ".log".to_string(), ".bak".to_string()]
}

fn default_expiration_months() -> u32 {
    12
}

fn default_concurrency() -> usize {
    4
}

fn default_link_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_true() -> bool {
    true
}

/// Normalize an extension for comparison: trimmed, lower-cased, with a
/// leading dot. An empty input stays empty.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self.concurrency == Some(0) {
            return Err("Concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with default settings for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            expiration_months: default_expiration_months(),
            unwanted_extensions: default_unwanted_extensions(),
            concurrency: default_concurrency(),
            link_timeout: default_link_timeout(),
            deadline: None,
            include_hidden: true,
            reference_time: SystemTime::now(),
        }
    }

    /// Check whether an extension is on the unwanted list.
    pub fn is_unwanted(&self, extension: &str) -> bool {
        let ext = normalize_extension(extension);
        if ext.is_empty() {
            return false;
        }
        self.unwanted_extensions
            .iter()
            .any(|candidate| normalize_extension(candidate) == ext)
    }

    /// Length of the activity window.
    pub fn expiration_window(&self) -> Duration {
        expiration_window(self.expiration_months)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
