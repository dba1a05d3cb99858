//! Object and record store interfaces with in-memory and filesystem backends

use crate::error::StoreError;
use crate::types::StoredTransaction;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Read access to stored raw emails
pub trait ObjectStore {
    /// Fetch an object by key; `Ok(None)` when the key does not exist
    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

/// Outcome of a conditional write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Inserted,
    AlreadyExists,
}

/// Keyed transaction storage with insert-if-absent semantics
pub trait RecordStore {
    /// Insert `item` unless a record with the same `message_id` exists.
    /// Existing records are never overwritten.
    fn put_if_absent(&self, item: &StoredTransaction) -> Result<PutOutcome, StoreError>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_object(key)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn put_if_absent(&self, item: &StoredTransaction) -> Result<PutOutcome, StoreError> {
        (**self).put_if_absent(item)
    }
}

/// Keys map to file names, so anything that could escape the directory is refused
fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0'])
    {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// In-memory object store
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: HashMap<String, Vec<u8>>,
}

impl MemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.objects.insert(key.into(), body.into());
    }

    #[must_use]
    pub fn with_object(mut self, key: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(key, body);
        self
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.objects.get(key).cloned())
    }
}

/// In-memory record store
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, StoredTransaction>>,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, message_id: &str) -> Option<StoredTransaction> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(message_id)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryRecordStore {
    fn put_if_absent(&self, item: &StoredTransaction) -> Result<PutOutcome, StoreError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if records.contains_key(&item.message_id) {
            return Ok(PutOutcome::AlreadyExists);
        }
        records.insert(item.message_id.clone(), item.clone());
        Ok(PutOutcome::Inserted)
    }
}

/// Object store backed by a directory; each key is a file name
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ObjectStore for FsObjectStore {
    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        let path = self.root.join(key);
        match fs::read(&path) {
            Ok(body) => {
                debug!("Read {} bytes from {}", body.len(), path.display());
                Ok(Some(body))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Record store backed by a directory holding one JSON file per record
///
/// Files are created exclusively, so when several writers race on the same
/// `message_id` exactly one of them inserts.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    /// Open the table directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn record_path(&self, message_id: &str) -> PathBuf {
        self.root.join(format!("{message_id}.json"))
    }

    /// Load a stored record, if present
    pub fn get(&self, message_id: &str) -> Result<Option<StoredTransaction>, StoreError> {
        validate_key(message_id)?;
        match fs::read(self.record_path(message_id)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl RecordStore for FsRecordStore {
    fn put_if_absent(&self, item: &StoredTransaction) -> Result<PutOutcome, StoreError> {
        validate_key(&item.message_id)?;
        let path = self.record_path(&item.message_id);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(PutOutcome::AlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        let written = serde_json::to_vec_pretty(item)
            .map_err(StoreError::from)
            .and_then(|bytes| file.write_all(&bytes).map_err(StoreError::from));

        if let Err(e) = written {
            // Leave no half-written record behind to block a retry.
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        debug!("Wrote record {}", path.display());
        Ok(PutOutcome::Inserted)
    }
}
