//! # In-Memory Storage
//!
//! Process-local backend used in tests and in host environments with no
//! durable storage. Expired entries are reclaimed lazily on access.

use std::collections::HashMap;
use std::time::Duration;

use c15t_core::Timestamp;
use parking_lot::Mutex;

use crate::backend::{expiry_from_ttl, is_expired, StorageBackend, StorageError};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Timestamp>,
}

/// An in-memory key-value store with lazy TTL expiry.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries (expired entries are not counted).
    pub fn len(&self) -> usize {
        let now = Timestamp::now();
        self.entries
            .lock()
            .values()
            .filter(|e| !is_expired(e.expires_at, now))
            .count()
    }

    /// Whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get(key) else {
            return Ok(None);
        };
        if is_expired(entry.expires_at, Timestamp::now()) {
            entries.remove(key);
            return Ok(None);
        }
        Ok(Some(entry.value.clone()))
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.and_then(expiry_from_ttl),
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn has(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}
