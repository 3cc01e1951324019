//! Durable filter preference store
//!
//! The flag lives in a small JSON key-value file:
//! ```text
//! ~/.linkhub/
//! └── preferences.json   {"contentFilterEnabled": "true"}
//! ```
//!
//! Writes are synchronous and flushed before returning. When the backend is
//! unavailable the store keeps working from memory and logs the failure.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key-value persistence used by `PreferenceStore`
pub trait StorageBackend: Send + Sync {
    /// Read a value; `Ok(None)` when the key has never been written
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write a value durably
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

/// JSON file backend
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            Error::Storage(format!(
                "Corrupt preference file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(Error::Storage(msg)) => {
                tracing::warn!("{}; rewriting preference file", msg);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(serde_json::to_string_pretty(&map)?.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory backend
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| Error::Internal("preference map poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| Error::Internal("preference map poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Authoritative `hide_sensitive` flag with a durable mirror
pub struct PreferenceStore {
    backend: Box<dyn StorageBackend>,
    key: String,
    hide_sensitive: bool,
    durable: bool,
}

impl PreferenceStore {
    /// Create a store; call `load` before reading
    pub fn new(backend: Box<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            hide_sensitive: false,
            durable: true,
        }
    }

    /// Read the persisted flag, writing the default `false` if it was never set
    pub fn load(&mut self) -> bool {
        match self.backend.read(&self.key) {
            Ok(Some(value)) => {
                self.hide_sensitive = parse_flag(&value);
                self.durable = true;
            }
            Ok(None) => {
                self.hide_sensitive = false;
                self.persist();
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    "Preference storage unavailable, using in-memory value: {}",
                    e
                );
                self.durable = false;
            }
        }
        tracing::debug!(hide_sensitive = self.hide_sensitive, "Loaded filter preference");
        self.hide_sensitive
    }

    pub fn get(&self) -> bool {
        self.hide_sensitive
    }

    /// Update the in-memory flag and persist it before returning
    pub fn set(&mut self, hide_sensitive: bool) {
        self.hide_sensitive = hide_sensitive;
        self.persist();
    }

    /// Whether the last load/set reached durable storage
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    fn persist(&mut self) {
        let value = if self.hide_sensitive { "true" } else { "false" };
        match self.backend.write(&self.key, value) {
            Ok(()) => self.durable = true,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    "Failed to persist filter preference, keeping in-memory value: {}",
                    e
                );
                self.durable = false;
            }
        }
    }
}

fn parse_flag(value: &str) -> bool {
    match value {
        "true" => true,
        "false" => false,
        other => {
            tracing::warn!(value = %other, "Unexpected stored filter value, treating as false");
            false
        }
    }
}
