//! Resolution of a file's owning principal.

use std::fs::Metadata;
use std::path::Path;

use compact_str::CompactString;
use dashmap::DashMap;

use filesweep_core::RecordError;

/// Maps a file to the name of the principal that owns it.
///
/// Shared by all workers; lookups may fail per file.
pub trait OwnerResolver: Send + Sync {
    /// Resolve the owner of `path`, whose metadata has already been read.
    fn owner(&self, path: &Path, metadata: &Metadata) -> Result<CompactString, RecordError>;
}

/// Owner lookup through the operating system's account database.
///
/// On Unix the file's uid is looked up in the passwd database; a uid with no
/// entry is rendered numerically, the way `ls -l` does. Names are cached per
/// uid since most trees have only a handful of owners.
#[derive(Debug, Default)]
pub struct SystemOwnerResolver {
    cache: DashMap<u32, CompactString>,
}

impl SystemOwnerResolver {
    /// Create a resolver with an empty cache.
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    #[cfg(unix)]
    fn lookup(&self, path: &Path, uid: u32) -> Result<CompactString, RecordError> {
        use nix::unistd::{Uid, User};

        if let Some(name) = self.cache.get(&uid) {
            return Ok(name.value().clone());
        }

        let name = match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(user)) => CompactString::from(user.name),
            Ok(None) => CompactString::from(uid.to_string()),
            Err(errno) => {
                return Err(RecordError::Owner {
                    path: path.to_path_buf(),
                    message: errno.to_string(),
                });
            }
        };

        self.cache.insert(uid, name.clone());
        Ok(name)
    }
}

impl OwnerResolver for SystemOwnerResolver {
    #[cfg(unix)]
    fn owner(&self, path: &Path, metadata: &Metadata) -> Result<CompactString, RecordError> {
        use std::os::unix::fs::MetadataExt;

        self.lookup(path, metadata.uid())
    }

    #[cfg(not(unix))]
    fn owner(&self, path: &Path, _metadata: &Metadata) -> Result<CompactString, RecordError> {
        Err(RecordError::Owner {
            path: path.to_path_buf(),
            message: "owner lookup is not supported on this platform".to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::MetadataExt;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_current_owner() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("owned.txt");
        fs::write(&path, "x").unwrap();
        let metadata = fs::metadata(&path).unwrap();

        let resolver = SystemOwnerResolver::new();
        let owner = resolver.owner(&path, &metadata).unwrap();
        assert!(!owner.is_empty());

        let expected = nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(metadata.uid()))
            .unwrap()
            .map(|u| u.name)
            .unwrap_or_else(|| metadata.uid().to_string());
        assert_eq!(owner.as_str(), expected);
    }

    #[test]
    fn test_owner_is_cached() {
        let temp = TempDir::new().unwrap();
        let resolver = SystemOwnerResolver::new();

        for name in ["a.txt", "b.txt", "c.txt"] {
            let path = temp.path().join(name);
            fs::write(&path, name).unwrap();
            let metadata = fs::metadata(&path).unwrap();
            resolver.owner(&path, &metadata).unwrap();
        }

        assert_eq!(resolver.cache.len(), 1);
    }
}
