//! In-memory storage

use std::sync::{Mutex, MutexGuard};

use rustc_hash::FxHashMap;

use super::{Storage, StorageError};

/// A process-local store, optionally bounded by a byte quota the way browser
/// storage is.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<FxHashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store holding at most `quota` bytes of keys and values.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(quota),
        }
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the store lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, FxHashMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|_err| StorageError::Unavailable)
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.lock()?;

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();

            let requested = others + key.len() + value.len();

            if requested > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    quota,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);

        Ok(())
    }
}
