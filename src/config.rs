//! LinkHub configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main LinkHub configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkHubConfig {
    /// Durable preference storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote preference record
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Preference backend server
    #[serde(default)]
    pub server: ServerConfig,

    /// Search presentation
    #[serde(default)]
    pub search: SearchConfig,
}

impl LinkHubConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }
}

/// Durable preference storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the preference file
    pub dir: PathBuf,

    /// Preference file name inside `dir`
    pub file: String,

    /// Key under which the filter flag is stored
    pub key: String,
}

impl StorageConfig {
    /// Full path of the preference file
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: dirs_next::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".linkhub"),
            file: "preferences.json".to_string(),
            key: crate::preference::FILTER_PREFERENCE_KEY.to_string(),
        }
    }
}

/// Remote preference record configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Push preference changes to the backend
    pub enabled: bool,

    /// Preference endpoint URL
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://127.0.0.1:5000/api/filter/preference".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Preference backend server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
        }
    }
}

/// Search presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Marker inserted before each highlighted occurrence
    pub highlight_open: String,

    /// Marker inserted after each highlighted occurrence
    pub highlight_close: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            highlight_open: "<mark>".to_string(),
            highlight_close: "</mark>".to_string(),
        }
    }
}
