//! Storage
//!
//! The key-value persistence collaborator shared by the ledgers. Values are JSON
//! documents stored under fixed string keys, one key per ledger.

use std::{io, sync::Arc};

use mockall::automock;
use thiserror::Error;

mod file;
mod json;
mod memory;

pub use file::FileStore;
pub use json::{read_json, write_json};
pub use memory::MemoryStore;

/// Storage key holding the JSON array of cart line-items.
pub const CART_KEY: &str = "cart";

/// Storage key holding the JSON array of local orders, newest first.
pub const ORDERS_KEY: &str = "userOrders";

/// Storage key holding the saved customer details.
pub const CUSTOMER_INFO_KEY: &str = "ourstore_customer_info";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage io error")]
    Io(#[from] io::Error),

    /// The stored document could not be decoded.
    #[error("stored document is corrupt")]
    Corrupt(#[source] serde_json::Error),

    /// A value could not be encoded before writing.
    #[error("failed to encode value for key {key}")]
    Encode {
        /// Key being written.
        key: String,

        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing the value would exceed the store's byte quota.
    #[error("writing {requested} bytes to {key} exceeds the {quota} byte quota")]
    QuotaExceeded {
        /// Key being written.
        key: String,

        /// Total bytes the store would hold after the write.
        requested: usize,

        /// Maximum bytes the store may hold.
        quota: usize,
    },

    /// The store cannot be used in this environment.
    #[error("storage is unavailable")]
    Unavailable,
}

/// A string key-value store.
///
/// Every call is a single synchronous attempt. Implementations are free to
/// fail; callers decide whether to degrade or propagate.
#[automock]
pub trait Storage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejects the write.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
