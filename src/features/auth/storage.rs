//! Persistent key-value storage standing in for browser local storage. The
//! auth store only ever touches one key, but the trait keeps the backend
//! swappable so tests and ephemeral sessions can run without touching disk.

use crate::errors::AppError;
use std::{
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub trait KeyValueStore {
    /// Reads a value, `Ok(None)` when the key is absent.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// # Errors
    /// Returns `AppError::Storage` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

type Entries = BTreeMap<String, String>;

/// JSON object on disk, re-read on every access so separate processes see
/// each other's writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<String>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::Storage(format!(
                "Failed to read {}: {err}",
                self.path.display()
            ))),
        }
    }

    fn decode(&self, contents: &str) -> Result<Entries, AppError> {
        serde_json::from_str(contents).map_err(|err| {
            AppError::Storage(format!(
                "Failed to decode {}: {err}",
                self.path.display()
            ))
        })
    }

    fn load(&self) -> Result<Entries, AppError> {
        self.read()?
            .map_or_else(|| Ok(Entries::new()), |contents| self.decode(&contents))
    }

    /// Entries to write back. An undecodable file is replaced rather than
    /// kept, so a corrupt state file cannot pin the session.
    fn load_for_write(&self) -> Result<Entries, AppError> {
        let Some(contents) = self.read()? else {
            return Ok(Entries::new());
        };
        Ok(self.decode(&contents).unwrap_or_else(|err| {
            warn!("Replacing state file: {err}");
            Entries::new()
        }))
    }

    fn persist(&self, entries: &Entries) -> Result<(), AppError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|err| {
            AppError::Storage(format!("Failed to create {}: {err}", parent.display()))
        })?;

        let contents = serde_json::to_string_pretty(entries)
            .map_err(|err| AppError::Storage(format!("Failed to encode entries: {err}")))?;

        // Temp file in the same directory, then rename over the target.
        let mut temp_file = NamedTempFile::new_in(parent).map_err(|err| {
            AppError::Storage(format!(
                "Failed to create temp file in {}: {err}",
                parent.display()
            ))
        })?;
        temp_file.write_all(contents.as_bytes()).map_err(|err| {
            AppError::Storage(format!("Failed to write temp file: {err}"))
        })?;
        temp_file.persist(&self.path).map_err(|err| {
            AppError::Storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                err.error
            ))
        })?;

        debug!(path = %self.path.display(), "state file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.load_for_write()?;
        if entries.remove(key).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.persist(&entries)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut Entries) -> T) -> Result<T, AppError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{FileStore, KeyValueStore, MemoryStore};
    use crate::errors::AppError;
    use std::fs;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("authenticated").unwrap(), None);

        store.set("authenticated", "true").unwrap();
        assert_eq!(store.get("authenticated").unwrap().as_deref(), Some("true"));

        store.remove("authenticated").unwrap();
        assert_eq!(store.get("authenticated").unwrap(), None);
        store.remove("authenticated").unwrap();
    }

    #[test]
    fn file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.json"));
        assert_eq!(store.get("authenticated").unwrap(), None);
        store.remove("authenticated").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = FileStore::new(&path);

        store.set("authenticated", "true").unwrap();
        assert!(path.exists());
        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("authenticated").unwrap().as_deref(),
            Some("true")
        );

        reopened.remove("authenticated").unwrap();
        assert_eq!(store.get("authenticated").unwrap(), None);
    }

    #[test]
    fn file_store_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.json"));
        store.set("theme", "dark").unwrap();
        store.set("authenticated", "true").unwrap();
        store.remove("authenticated").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn file_store_rejects_corrupt_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get("authenticated"), Err(AppError::Storage(_))));
    }

    #[test]
    fn file_store_ignores_stray_tmp_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::create_dir(path.with_extension("tmp")).unwrap();
        let store = FileStore::new(&path);

        store.set("authenticated", "true").unwrap();
        assert_eq!(store.get("authenticated").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn file_store_overwrites_corrupt_contents_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileStore::new(&path);

        store.set("authenticated", "true").unwrap();
        assert_eq!(store.get("authenticated").unwrap().as_deref(), Some("true"));

        fs::write(&path, "{not json").unwrap();
        store.remove("authenticated").unwrap();
        assert_eq!(store.get("authenticated").unwrap(), None);
    }
}
