//! # Script Host Seam
//!
//! The engine does not touch the DOM (or any other script environment)
//! directly; it drives a `ScriptHost`. A browser binding implements this
//! over document APIs; servers and tests use the implementations here.

use c15t_core::ScriptId;
use thiserror::Error;

use crate::script::ScriptDescriptor;

/// Errors raised by a script host.
#[derive(Error, Debug)]
pub enum HostError {
    /// The tag could not be injected.
    #[error("injection failed for {script_id}: {reason}")]
    Injection {
        /// The script that failed to inject.
        script_id: ScriptId,
        /// Host-specific detail.
        reason: String,
    },

    /// The tag could not be removed.
    #[error("removal failed for {script_id}: {reason}")]
    Removal {
        /// The script that failed to remove.
        script_id: ScriptId,
        /// Host-specific detail.
        reason: String,
    },
}

/// Owns script tag injection and removal.
pub trait ScriptHost: Send {
    /// Inject the script's tag into the environment.
    fn inject(&mut self, script: &ScriptDescriptor) -> Result<(), HostError>;

    /// Remove the script's tag from the environment.
    fn remove(&mut self, id: &ScriptId) -> Result<(), HostError>;
}

/// A host that does nothing. For callback-only deployments and
/// environments with no script tags at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl ScriptHost for NoopHost {
    fn inject(&mut self, _script: &ScriptDescriptor) -> Result<(), HostError> {
        Ok(())
    }

    fn remove(&mut self, _id: &ScriptId) -> Result<(), HostError> {
        Ok(())
    }
}

/// One observed host interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A tag was injected.
    Injected(ScriptId),
    /// A tag was removed.
    Removed(ScriptId),
}

/// A host that records every interaction in order. Test double.
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Observed interactions, oldest first.
    pub events: Vec<HostEvent>,
}

impl RecordingHost {
    /// Create an empty recording host.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScriptHost for RecordingHost {
    fn inject(&mut self, script: &ScriptDescriptor) -> Result<(), HostError> {
        self.events.push(HostEvent::Injected(script.id.clone()));
        Ok(())
    }

    fn remove(&mut self, id: &ScriptId) -> Result<(), HostError> {
        self.events.push(HostEvent::Removed(id.clone()));
        Ok(())
    }
}
