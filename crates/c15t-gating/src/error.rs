//! # Gating Errors

use c15t_core::ScriptId;
use thiserror::Error;

/// Errors raised by the gating engine's registry operations.
#[derive(Error, Debug)]
pub enum GatingError {
    /// A script with this id is already registered.
    #[error("duplicate script id: {0}")]
    DuplicateScript(ScriptId),
}
