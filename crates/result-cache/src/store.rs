use crate::error::CacheError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Raw key-value storage for serialized cache payloads.
pub trait CacheStore: Send + Sync {
    /// Returns the stored payload, or `None` if the slot is empty.
    fn load(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Replaces the slot's payload.
    fn save(&self, key: &str, payload: &str) -> Result<(), CacheError>;

    /// Empties the slot. Removing an empty slot is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Stores each slot as `<directory>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `directory`, creating the directory if needed.
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, CacheError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.directory.join(format!("{key}.json")))
    }
}

impl CacheStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.slot_path(key)?) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), CacheError> {
        let path = self.slot_path(key)?;
        // Write-then-rename so a reader never sees a half-written slot.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, payload)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.slot_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A process-local store, used by tests and when no cache directory is wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.slots.lock().get(key).cloned())
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), CacheError> {
        self.slots.lock().insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.slots.lock().remove(key);
        Ok(())
    }
}
