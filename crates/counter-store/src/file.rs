//! File-Backed Counter Store

use crate::{CounterStore, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Counter store persisted as a JSON object of `key -> value` at a fixed
/// path.
///
/// Values are loaded once on open; every `set` rewrites the whole file.
/// That is deliberate: stores hold a handful of small counters, not bulk
/// data, and a whole-file rewrite keeps the on-disk format trivially
/// inspectable.
#[derive(Debug)]
pub struct FileCounterStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl FileCounterStore {
    /// Open the store at `path`, loading existing values if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let values = if path.exists() {
            let content =
                fs::read_to_string(&path).map_err(|e| StoreError::Io(e.to_string()))?;
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt(e.to_string()))?
        } else {
            BTreeMap::new()
        };

        info!("Opened counter store at {}", path.display());
        Ok(Self { path, values })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(&self.values)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| StoreError::Io(e.to_string()))
    }
}

impl CounterStore for FileCounterStore {
    fn get(&self, key: &str) -> Result<i64, StoreError> {
        Ok(self.values.get(key).copied().unwrap_or(0))
    }

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()?;
        debug!("Persisted {} = {}", key, value);
        Ok(())
    }
}
