//! Recursive enumeration of regular files under a root.

use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use filesweep_core::{ScanConfig, ScanError, ScanWarning};

/// Lazily lists every regular file below a validated root.
#[derive(Debug, Clone)]
pub struct FileEnumerator {
    root: PathBuf,
    include_hidden: bool,
    threads: usize,
}

impl FileEnumerator {
    /// Validate the configured root and prepare an enumerator for it.
    ///
    /// Fails before any walking happens if the root is missing or is not a
    /// directory.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        let root = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::root(&config.root, e))?;

        if !root.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }

        Ok(Self {
            root,
            include_hidden: config.include_hidden,
            threads: config.concurrency.max(1),
        })
    }

    /// Canonical root being enumerated.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree.
    ///
    /// Yields each regular file exactly once; directories and symlinks are
    /// skipped. A directory that cannot be read yields an `Err` warning and
    /// the walk carries on.
    pub fn files(&self) -> impl Iterator<Item = Result<PathBuf, ScanWarning>> {
        let parallelism = match self.threads {
            1 => Parallelism::Serial,
            n => Parallelism::RayonNewPool(n),
        };

        let walker = WalkDir::new(&self.root)
            .parallelism(parallelism)
            .skip_hidden(!self.include_hidden)
            .follow_links(false)
            .min_depth(1);

        walker.into_iter().filter_map(|entry_result| match entry_result {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.path())),
            Ok(_) => None,
            Err(err) => {
                let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                Some(Err(ScanWarning::read_error(path, err.to_string())))
            }
        })
    }
}
