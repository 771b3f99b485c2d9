//! # Storage Backend Trait
//!
//! The seam between the consent manager and whatever actually holds the
//! persisted consent record. Implementations must be cheap to call — the
//! manager writes after every mutation.

use std::time::Duration;

use c15t_core::Timestamp;
use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend is not usable in this environment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error from a disk-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A key-value store for persisted consent state.
///
/// `set` with a TTL stores an entry that reads as absent once the TTL
/// elapses; backends may reclaim the space lazily. Values are opaque
/// strings — the caller owns the encoding.
pub trait StorageBackend: Send + Sync {
    /// Read the value under `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, optionally expiring after `ttl`.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError>;

    /// Remove the entry under `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Whether a live (non-expired) entry exists under `key`.
    fn has(&self, key: &str) -> Result<bool, StorageError>;
}

/// Absolute expiry for a TTL starting now. Durations too large to
/// represent are treated as "never expires".
pub(crate) fn expiry_from_ttl(ttl: Duration) -> Option<Timestamp> {
    let secs = i64::try_from(ttl.as_secs()).ok()?;
    let expires = Timestamp::now().epoch_secs().checked_add(secs)?;
    Timestamp::from_epoch_secs(expires).ok()
}

/// Whether an entry with the given expiry is past it.
pub(crate) fn is_expired(expires_at: Option<Timestamp>, now: Timestamp) -> bool {
    matches!(expires_at, Some(at) if now >= at)
}
