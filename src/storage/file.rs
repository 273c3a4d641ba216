//! File-backed storage

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use tracing::{debug, warn};

use super::{Storage, StorageError};

type Document = BTreeMap<String, String>;

/// A store persisting every key in a single JSON document on disk.
///
/// The document is re-read on each call so separate processes sharing the
/// file observe each other's writes, and rewritten in full on each mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.guard.lock().map_err(|_err| StorageError::Unavailable)
    }

    fn read_document(&self) -> Result<Document, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(err) => return Err(err.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&raw).map_err(StorageError::Corrupt)
    }

    /// Reads the document to be modified, flagging whether it was corrupt.
    /// A corrupt document is replaced by an empty one so the store stays
    /// writable.
    fn read_document_for_update(&self) -> Result<(Document, bool), StorageError> {
        match self.read_document() {
            Ok(document) => Ok((document, false)),
            Err(StorageError::Corrupt(source)) => {
                warn!(
                    path = %self.path.display(),
                    error = %source,
                    "discarding corrupt storage document"
                );

                Ok((Document::new(), true))
            }
            Err(err) => Err(err),
        }
    }

    fn write_document(&self, document: &Document) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_string_pretty(document).map_err(|source| StorageError::Encode {
                key: self.path.display().to_string(),
                source,
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target then rename over it.
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), keys = document.len(), "wrote storage document");

        Ok(())
    }
}

impl Storage for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock()?;

        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock()?;

        let (mut document, _) = self.read_document_for_update()?;
        document.insert(key.to_string(), value.to_string());

        self.write_document(&document)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock()?;

        let (mut document, discarded) = self.read_document_for_update()?;

        if document.remove(key).is_none() && !discarded {
            return Ok(());
        }

        self.write_document(&document)
    }
}
