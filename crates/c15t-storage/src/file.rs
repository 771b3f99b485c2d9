//! # File-Backed Storage
//!
//! A single JSON document on disk holding all entries. Suited to host
//! environments (desktop apps, server-side rendering caches) where the
//! consent record must survive a restart. Each operation reads and
//! rewrites the whole document; the store holds one small record per
//! subject, so this stays cheap.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use c15t_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::backend::{expiry_from_ttl, is_expired, StorageBackend, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedEntry {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<Timestamp>,
}

type Document = BTreeMap<String, PersistedEntry>;

/// A key-value store persisted as one JSON document.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a store persisted at the given path. The file is created on
    /// first write; a missing file reads as an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The document path of this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, doc: &Document) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let doc = self.read_document()?;
        match doc.get(key) {
            Some(entry) if !is_expired(entry.expires_at, Timestamp::now()) => {
                Ok(Some(entry.value.clone()))
            }
            _ => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError> {
        let mut doc = self.read_document()?;
        doc.insert(
            key.to_string(),
            PersistedEntry {
                value: value.to_string(),
                expires_at: ttl.and_then(expiry_from_ttl),
            },
        );
        self.write_document(&doc)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut doc = self.read_document()?;
        if doc.remove(key).is_some() {
            self.write_document(&doc)?;
        }
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}
