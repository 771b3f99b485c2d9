//! # Consent Errors

use thiserror::Error;

/// Errors raised by consent manager operations.
#[derive(Error, Debug)]
pub enum ConsentError {
    /// A save-mode string did not match `all`, `necessary`, or `custom`.
    /// Raised before any mutation; state is unchanged.
    #[error("unknown save mode: {0:?}")]
    InvalidSaveMode(String),

    /// The persisted consent record could not be decoded.
    #[error("corrupt consent record: {0}")]
    CorruptRecord(#[from] serde_json::Error),
}
