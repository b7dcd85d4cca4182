//! Persistent key/value storage for raw template sources.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Template store I/O failed at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template store '{path}' is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string store keyed by template name.
pub trait TemplateStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, source: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Store that lives as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl TemplateStore for MemoryStore {
    fn get(&self, name: &str) -> Option<String> {
        self.entries.read().get(name).cloned()
    }

    fn set(&self, name: &str, source: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert(name.to_string(), source.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries.write().clear();
        Ok(())
    }
}

/// Store backed by a JSON object file, surviving restarts.
///
/// Reads are served from memory. Each write re-reads the file under an
/// exclusive lock, merges the new entry and replaces the file atomically, so
/// several processes can share one store without dropping each other's
/// entries.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = read_entries(&path)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened template store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Exclusive lock on the sibling `.lock` file, held until the returned
    /// file is dropped.
    fn lock(&self) -> Result<File, StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.path.with_extension("lock"))
            .map_err(|e| self.io_error(e))?;
        lock.lock_exclusive().map_err(|e| self.io_error(e))?;
        Ok(lock)
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(entries).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl TemplateStore for FileStore {
    fn get(&self, name: &str) -> Option<String> {
        self.entries.read().get(name).cloned()
    }

    fn set(&self, name: &str, source: &str) -> Result<(), StoreError> {
        let lock = self.lock()?;
        let mut on_disk = read_entries(&self.path)?;
        on_disk.insert(name.to_string(), source.to_string());
        self.write_entries(&on_disk)?;
        drop(lock);

        *self.entries.write() = on_disk;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let lock = self.lock()?;
        self.write_entries(&HashMap::new())?;
        drop(lock);

        self.entries.write().clear();
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<HashMap<String, String>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("tax-page").is_none());
        store.set("tax-page", "<h1>{{province}}</h1>").unwrap();
        assert_eq!(store.get("tax-page").as_deref(), Some("<h1>{{province}}</h1>"));
        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("templates.json");

        let store = FileStore::open(&path).unwrap();
        store.set("province-item", "<li>{{code}}</li>").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("province-item").as_deref(),
            Some("<li>{{code}}</li>")
        );
    }

    #[test]
    fn file_store_merges_writes_from_other_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");

        let first = FileStore::open(&path).unwrap();
        let second = FileStore::open(&path).unwrap();
        first.set("a", "A").unwrap();
        second.set("b", "B").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").as_deref(), Some("A"));
        assert_eq!(reopened.get("b").as_deref(), Some("B"));
    }

    #[test]
    fn write_lock_is_released_after_each_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        let store = FileStore::open(&path).unwrap();
        store.set("a", "A").unwrap();

        let other = OpenOptions::new()
            .write(true)
            .open(path.with_extension("lock"))
            .unwrap();
        other.try_lock_exclusive().unwrap();
        FileExt::unlock(&other).unwrap();

        store.clear().unwrap();
        other.try_lock_exclusive().unwrap();
    }

    #[test]
    fn file_store_clear_empties_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        let store = FileStore::open(&path).unwrap();
        store.set("a", "A").unwrap();
        store.clear().unwrap();

        assert!(store.get("a").is_none());
        assert!(FileStore::open(&path).unwrap().get("a").is_none());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
