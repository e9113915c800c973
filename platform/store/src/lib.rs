//! Durable key-value storage used to persist HR state between runs.
//!
//! A store holds whole text values under short keys. Writes overwrite the
//! previous value; there are no transactions and no partial updates.

mod file;
mod memory;

use std::{io, path::PathBuf, str::FromStr, sync::Arc};

use serde::Deserialize;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Capability set the HR repository needs from persistent storage.
pub trait DurableStore: Send + Sync {
    /// Returns the stored text, or `None` when the key was never written or
    /// the backing storage cannot be read.
    fn read(&self, key: &str) -> Option<String>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, text: &str) -> StoreResult<()>;

    /// Drops `key`. Failures are logged and otherwise ignored.
    fn remove(&self, key: &str);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(StoreError::Unavailable(format!(
                "unknown store backend {other}"
            ))),
        }
    }
}

/// Where and how durable state is kept.
#[derive(Clone, Debug, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl StoreSettings {
    pub fn new(backend: StoreBackend, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            data_dir: data_dir.into(),
        }
    }

    /// Reads `HRNET_STORE` and `HRNET_DATA_DIR`.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let backend = match lookup("HRNET_STORE") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => StoreBackend::default(),
        };
        let data_dir = lookup("HRNET_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        Ok(Self { backend, data_dir })
    }
}

/// Opens the store described by `settings`.
pub fn open_store(settings: &StoreSettings) -> StoreResult<Arc<dyn DurableStore>> {
    match settings.backend {
        StoreBackend::File => Ok(Arc::new(FileStore::open(&settings.data_dir)?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::default())),
    }
}

pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
