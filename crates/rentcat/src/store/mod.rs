//! Durable local state: a namespaced key-value storage and the two state
//! containers built on it.

use crate::prelude::*;
use log::warn;
use std::fs;
use std::path::PathBuf;

pub mod cursor;
pub mod favorites;

pub use cursor::PageCursorStore;
pub use favorites::FavoritesStore;

/// Namespaced string storage that survives restarts.
pub trait Storage {
    /// Stored value for `namespace`. Unreadable data reads as `None`.
    fn read(&self, namespace: &str) -> Result<Option<String>>;

    fn write(&self, namespace: &str, data: &str) -> Result<()>;

    fn remove(&self, namespace: &str) -> Result<()>;
}

/// One JSON file per namespace inside a state directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, namespace: &str) -> Result<Option<String>> {
        let path = self.path(namespace);
        if !path.exists() {
            return Ok(None);
        }

        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) => {
                warn!("ignoring unreadable state file {}: {}", path.display(), err);
                Ok(None)
            }
        }
    }

    fn write(&self, namespace: &str, data: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Storage(format!(
                "Failed to create state directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        // Write beside the target, then rename, so a crash never leaves half a file.
        let path = self.path(namespace);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path)
            .map_err(|e| Error::Storage(format!("Failed to replace {}: {}", path.display(), e)))?;

        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<()> {
        let path = self.path(namespace);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| Error::Storage(format!("Failed to remove {}: {}", path.display(), e)))?;
        }
        Ok(())
    }
}
