//! Counter Store
//!
//! Durable key-value persistence for named integer counters, with a
//! file-backed implementation for applications and a shareable in-memory
//! implementation for tests.

mod file;
mod memory;

pub use file::FileCounterStore;
pub use memory::MemoryCounterStore;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Corrupt store file: {0}")]
    Corrupt(String),
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Key-value storage for named integer counters.
///
/// Keys that were never written read as 0.
pub trait CounterStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<i64, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError>;
}
