//! # Error Types
//!
//! Core error type shared by the foundational modules. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//! Higher-layer crates define their own error enums and convert where a
//! core failure crosses their boundary.

use thiserror::Error;

/// Errors raised by the foundational type constructors and parsers.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A category string did not match any known consent category.
    #[error("unknown consent category: {0:?}")]
    UnknownCategory(String),

    /// A jurisdiction string did not match any known jurisdiction code.
    #[error("unknown jurisdiction code: {0:?}")]
    UnknownJurisdiction(String),

    /// A timestamp string could not be parsed as RFC 3339.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A script identifier failed validation.
    #[error("invalid script id: {0}")]
    InvalidScriptId(String),
}
