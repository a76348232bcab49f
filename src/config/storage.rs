// Durable key-value storage
//
// Preferences are persisted as string values under fixed keys, the same way a
// browser's local storage would hold them. FileStore keeps every key in one YAML
// mapping next to the other configuration files and rewrites it synchronously on
// each change.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::sync::Mutex;
use thiserror::Error;

/// Key holding the JSON-encoded [`AppSettings`](crate::models::AppSettings).
pub const SETTINGS_KEY: &str = "datasetCleanerSettings";

/// Key holding the raw id of the selected theme.
pub const THEME_KEY: &str = "themeId";

/// File name of the storage file inside the data directory.
pub const STORAGE_FILE_NAME: &str = "storage.yaml";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to write storage file {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize storage: {0}")]
    Serialize(#[from] serde_yaml_ng::Error),
}

/// Origin-scoped string storage with synchronous write-through.
///
/// Reads never fail: anything unreadable behaves like an absent key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// [`KeyValueStore`] backed by a YAML file.
#[derive(Debug)]
pub struct FileStore {
    path: Utf8PathBuf,
    entries: Mutex<IndexMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, reading whatever it currently holds.
    ///
    /// A missing file starts an empty store; an unreadable or corrupt one is
    /// logged and also treated as empty.
    pub fn open<P: AsRef<Utf8Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = Self::read_entries(&path);

        tracing::debug!("Opened storage at {} with {} keys", path, entries.len());

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn read_entries(path: &Utf8Path) -> IndexMap<String, String> {
        if !path.exists() {
            return IndexMap::new();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read storage file {}: {}", path, e);
                return IndexMap::new();
            }
        };

        if contents.trim().is_empty() {
            return IndexMap::new();
        }

        match serde_yaml_ng::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Storage file {} is corrupt, starting empty: {}", path, e);
                IndexMap::new()
            }
        }
    }

    fn flush(&self, entries: &IndexMap<String, String>) -> Result<(), StorageError> {
        let yaml = serde_yaml_ng::to_string(entries)?;
        fs::write(&self.path, yaml).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.shift_remove(key).is_none() {
            return Ok(());
        }
        self.flush(&entries)
    }
}

/// In-memory [`KeyValueStore`], used by tests and as a fallback when the data
/// directory is not writable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
