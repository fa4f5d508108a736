//! Client-durable key/value storage.
//!
//! In a browser this is `window.localStorage`; values survive a full page
//! reload but not the user clearing site data.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::error::{StorageError, StorageResult};

/// Narrow string key/value interface over the client's durable store.
pub trait DurableStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-memory store for native builds and tests.
///
/// `set_available(false)` makes every call fail with
/// [`StorageError::Unavailable`], mimicking a browser with storage disabled.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every operation.
    pub fn unavailable() -> Self {
        let storage = Self::default();
        storage.set_available(false);
        storage
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.set(!available);
    }

    /// Direct read that bypasses the availability switch.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.unavailable.get() {
            Err(StorageError::unavailable("memory storage disabled"))
        } else {
            Ok(())
        }
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
