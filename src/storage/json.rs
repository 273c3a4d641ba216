//! JSON values over a [`Storage`].

use serde::{Serialize, de::DeserializeOwned};

use super::{Storage, StorageError};

/// Read and decode the JSON value under `key`.
///
/// # Errors
///
/// - [`StorageError::Corrupt`]: the stored value is not valid JSON for `T`.
/// - Any error raised by the backend while reading.
pub fn read_json<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(StorageError::Corrupt)
}

/// Encode `value` as JSON and store it under `key`, replacing the previous value.
///
/// # Errors
///
/// - [`StorageError::Encode`]: `value` could not be encoded.
/// - Any error raised by the backend while writing.
pub fn write_json<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;

    storage.set(key, &encoded)
}
