use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{DurableStore, StoreError, StoreResult, validate_key};

/// Keeps each key in its own `<key>.json` file under a data directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens `root`, creating it when missing.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        debug!(root = %root.display(), "file store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl DurableStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        let path = match self.path_for(key) {
            Ok(path) => path,
            Err(err) => {
                warn!(%err, "file store read rejected");
                return None;
            }
        };
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), %err, "file store read failed");
                None
            }
        }
    }

    fn write(&self, key: &str, text: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        fs::write(&path, text).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&self, key: &str) {
        let path = match self.path_for(key) {
            Ok(path) => path,
            Err(err) => {
                warn!(%err, "file store remove rejected");
                return;
            }
        };
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %path.display(), %err, "file store remove failed"),
        }
    }
}
