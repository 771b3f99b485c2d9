//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers in the consent stack. These
//! prevent accidental identifier confusion — you cannot pass a
//! `SubjectId` where a `ConsentRecordId` is expected.
//!
//! `ScriptId` is string-backed because integrators choose it (it doubles
//! as the DOM element id of the injected tag); the UUID-backed types are
//! generated by this stack.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Identifier of a gated script, chosen by the integrator.
///
/// Also used as the element id of the injected script tag, so it must be
/// non-empty and contain no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScriptId(String);

impl ScriptId {
    /// Validate and wrap a script identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::InvalidScriptId("empty".to_string()));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidScriptId(format!(
                "contains whitespace: {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScriptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anonymous identifier for a consent subject (the person whose consent
/// is recorded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub Uuid);

impl SubjectId {
    /// Generate a new random subject identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subject:{}", self.0)
    }
}

/// Identifier of a single consent audit record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsentRecordId(pub Uuid);

impl ConsentRecordId {
    /// Generate a new random record identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConsentRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConsentRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_id_accepts_reasonable_ids() {
        for id in ["ga4", "meta-pixel", "hotjar_01", "x.y"] {
            assert!(ScriptId::new(id).is_ok(), "{id:?} should be valid");
        }
    }

    #[test]
    fn test_script_id_rejects_empty_and_whitespace() {
        assert!(ScriptId::new("").is_err());
        assert!(ScriptId::new("google tag").is_err());
        assert!(ScriptId::new("a\tb").is_err());
    }

    #[test]
    fn test_subject_ids_are_unique() {
        assert_ne!(SubjectId::new(), SubjectId::new());
    }

    #[test]
    fn test_display_prefixes() {
        let subject = SubjectId::new();
        assert!(subject.to_string().starts_with("subject:"));
        let record = ConsentRecordId::new();
        assert!(record.to_string().starts_with("record:"));
    }
}
