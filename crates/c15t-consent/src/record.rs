//! # Consent Audit Trail
//!
//! Every consent mutation is logged with its timestamp and the grants in
//! effect after it, creating an append-only trail the manager exposes for
//! observability and export.

use std::collections::BTreeMap;

use c15t_core::{ConsentCategory, ConsentRecordId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::manager::SaveMode;

/// Which operation produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum ConsentAction {
    /// A single category was set.
    Set {
        /// The category that changed.
        category: ConsentCategory,
        /// The grant it was set to.
        granted: bool,
    },
    /// A bulk save was applied.
    Save {
        /// Which save mode was used.
        mode: SaveMode,
    },
    /// State was reverted to the pre-decision defaults.
    Reset,
    /// Prompt visibility was overridden directly.
    PopupOverride {
        /// The visibility that was forced.
        visible: bool,
    },
}

/// Record of a single state mutation in the consent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentEventRecord {
    /// Unique record identifier.
    pub id: ConsentRecordId,
    /// When the mutation occurred (UTC).
    pub at: Timestamp,
    /// The operation that produced this record.
    pub action: ConsentAction,
    /// The grant map in effect after the mutation.
    pub consents_after: BTreeMap<ConsentCategory, bool>,
}

impl ConsentEventRecord {
    /// Build a record stamped with the current time.
    pub fn new(action: ConsentAction, consents_after: BTreeMap<ConsentCategory, bool>) -> Self {
        Self {
            id: ConsentRecordId::new(),
            at: Timestamp::now(),
            action,
            consents_after,
        }
    }
}
