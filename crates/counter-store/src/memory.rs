//! In-Memory Counter Store

use crate::{CounterStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory counter store.
///
/// Clones share the same underlying map, so a test can hand clones of one
/// logical store to several consumers and observe a single state.
#[derive(Debug, Clone, Default)]
pub struct MemoryCounterStore {
    values: Arc<Mutex<HashMap<String, i64>>>,
}

impl MemoryCounterStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all keys
    pub fn clear(&self) {
        if let Ok(mut values) = self.values.lock() {
            values.clear();
        }
    }
}

impl CounterStore for MemoryCounterStore {
    fn get(&self, key: &str) -> Result<i64, StoreError> {
        let values = self
            .values
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        Ok(values.get(key).copied().unwrap_or(0))
    }

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        values.insert(key.to_string(), value);
        Ok(())
    }
}
