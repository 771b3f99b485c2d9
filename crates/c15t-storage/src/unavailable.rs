//! # Unavailable Storage
//!
//! A backend whose every operation fails with
//! [`StorageError::Unavailable`]. Stands in for environments where
//! persistent storage is denied (private browsing, locked-down webviews)
//! so the degraded path of the consent manager can be exercised directly.

use std::time::Duration;

use crate::backend::{StorageBackend, StorageError};

/// A storage backend that is never usable.
#[derive(Debug, Clone, Default)]
pub struct UnavailableStorage;

impl UnavailableStorage {
    /// Create the always-failing backend.
    pub fn new() -> Self {
        Self
    }

    fn unavailable() -> StorageError {
        StorageError::Unavailable("storage backend disabled in this environment".to_string())
    }
}

impl StorageBackend for UnavailableStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(Self::unavailable())
    }

    fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> Result<(), StorageError> {
        Err(Self::unavailable())
    }

    fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Err(Self::unavailable())
    }

    fn has(&self, _key: &str) -> Result<bool, StorageError> {
        Err(Self::unavailable())
    }
}
