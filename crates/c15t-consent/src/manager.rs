//! # Consent Manager
//!
//! The sole writer of [`ConsentState`]. Operations follow a
//! build-then-commit discipline: the next state is fully constructed
//! before being swapped in, so observers never see a partial update.
//!
//! ## Persistence Model
//!
//! Every state-changing operation attempts a write to the storage
//! backend. Storage failure never fails the operation: the committed
//! in-memory state stands and the failure is logged — the stored copy is
//! a cache of the user's decision, not the source of truth. The one place
//! storage failure changes behavior is the *initial read*: when the
//! record cannot be read, the manager marks itself degraded and the
//! prompt stays suppressed rather than re-asking a user whose answer may
//! already exist.

use std::str::FromStr;

use c15t_config::ConsentConfig;
use c15t_core::{ConsentCategory, SubjectId};
use c15t_storage::StorageBackend;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConsentError;
use crate::record::{ConsentAction, ConsentEventRecord};
use crate::state::{ConsentState, PersistedConsent};

/// Bulk save strategies for [`ConsentManager::save_consents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Grant every offered category.
    All,
    /// Grant only the essential category.
    #[serde(rename = "necessary")]
    NecessaryOnly,
    /// Persist the current draft as-is.
    Custom,
}

impl SaveMode {
    /// Returns the lowercase identifier for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::NecessaryOnly => "necessary",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for SaveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaveMode {
    type Err = ConsentError;

    /// Parse a save mode; anything but `all`, `necessary`, or `custom`
    /// is rejected before any mutation happens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "necessary" => Ok(Self::NecessaryOnly),
            "custom" => Ok(Self::Custom),
            other => Err(ConsentError::InvalidSaveMode(other.to_string())),
        }
    }
}

/// Owns the canonical consent state and the persisted copy.
pub struct ConsentManager {
    config: ConsentConfig,
    storage: Box<dyn StorageBackend>,
    subject_id: SubjectId,
    state: ConsentState,
    audit: Vec<ConsentEventRecord>,
    degraded: bool,
}

impl std::fmt::Debug for ConsentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentManager")
            .field("subject_id", &self.subject_id)
            .field("state", &self.state)
            .field("degraded", &self.degraded)
            .finish_non_exhaustive()
    }
}

impl ConsentManager {
    /// Create a manager and attempt to hydrate state from storage.
    ///
    /// - A stored record restores the grants and marks the decision made.
    /// - No record leaves the pre-decision defaults in place.
    /// - A storage or decode failure degrades: defaults stand, the prompt
    ///   stays suppressed, and the failure is logged.
    pub fn new(config: ConsentConfig, storage: Box<dyn StorageBackend>) -> Self {
        let mut state = ConsentState::defaults(&config);
        let mut subject_id = SubjectId::new();
        let mut degraded = false;

        match storage.get(&config.storage_key) {
            Ok(Some(raw)) => match PersistedConsent::from_json(&raw) {
                Ok(persisted) => {
                    subject_id = persisted.subject_id;
                    for (category, granted) in persisted.consents {
                        state.set_grant(category, granted);
                    }
                    state.decision_made = true;
                    state.decided_at = persisted.decided_at;
                }
                Err(e) => {
                    warn!(
                        key = %config.storage_key,
                        error = %e,
                        "stored consent record is corrupt; treating state as untrusted"
                    );
                    degraded = true;
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(
                    key = %config.storage_key,
                    error = %e,
                    "consent storage unavailable; suppressing prompt"
                );
                degraded = true;
            }
        }

        state.loading = false;
        if degraded {
            state.show_popup = false;
        }

        Self {
            config,
            storage,
            subject_id,
            state,
            audit: Vec::new(),
            degraded,
        }
    }

    /// The current state.
    pub fn state(&self) -> &ConsentState {
        &self.state
    }

    /// An owned immutable copy of the current state.
    pub fn snapshot(&self) -> ConsentState {
        self.state.snapshot()
    }

    /// The resolved configuration this manager runs under.
    pub fn config(&self) -> &ConsentConfig {
        &self.config
    }

    /// The anonymous subject whose consent this manager records.
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    /// The append-only mutation trail, oldest first.
    pub fn audit_log(&self) -> &[ConsentEventRecord] {
        &self.audit
    }

    /// Whether the initial storage read failed and state is untrusted.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Set a single category grant.
    ///
    /// Revoking the essential category is a silent no-op: the state is
    /// unchanged, nothing is persisted, no record is appended. Any other
    /// change marks the decision made, stamps `decided_at`, persists, and
    /// returns the updated state.
    pub fn set_consent(&mut self, category: ConsentCategory, granted: bool) -> &ConsentState {
        if category.is_essential() && !granted {
            return &self.state;
        }
        if !self.state.tracks(category) {
            warn!(%category, "ignoring consent for category not offered by configuration");
            return &self.state;
        }

        let mut next = self.state.snapshot();
        next.set_grant(category, granted);
        next.decision_made = true;
        next.decided_at = Some(c15t_core::Timestamp::now());
        self.commit(next, ConsentAction::Set { category, granted });
        &self.state
    }

    /// Apply a bulk save, close the prompt, and return the committed
    /// snapshot.
    pub fn save_consents(&mut self, mode: SaveMode) -> ConsentState {
        let mut next = self.state.snapshot();
        match mode {
            SaveMode::All => next.grant_all(),
            SaveMode::NecessaryOnly => next.grant_only_essential(),
            SaveMode::Custom => {}
        }
        next.decision_made = true;
        next.show_popup = false;
        next.decided_at = Some(c15t_core::Timestamp::now());
        self.commit(next, ConsentAction::Save { mode });
        self.state.snapshot()
    }

    /// Revert to the pre-decision defaults and clear the persisted entry.
    ///
    /// Prompt visibility is left hidden; the caller re-runs the banner
    /// policy against the fresh state.
    pub fn reset_consents(&mut self) -> ConsentState {
        let mut next = ConsentState::defaults(&self.config);
        next.loading = false;

        if let Err(e) = self.storage.delete(&self.config.storage_key) {
            warn!(
                key = %self.config.storage_key,
                error = %e,
                "failed to clear persisted consent record"
            );
        }

        self.audit.push(ConsentEventRecord::new(
            ConsentAction::Reset,
            next.consents().clone(),
        ));
        self.state = next;
        self.state.snapshot()
    }

    /// Directly override prompt visibility, independent of decision
    /// state. Used to re-open the preferences surface.
    pub fn set_show_popup(&mut self, visible: bool) -> &ConsentState {
        if self.state.show_popup != visible {
            self.state.show_popup = visible;
            self.audit.push(ConsentEventRecord::new(
                ConsentAction::PopupOverride { visible },
                self.state.consents().clone(),
            ));
        }
        &self.state
    }

    /// Commit a fully built next state: persist, append the audit
    /// record, swap.
    fn commit(&mut self, next: ConsentState, action: ConsentAction) {
        let persisted = PersistedConsent {
            record_id: c15t_core::ConsentRecordId::new(),
            subject_id: self.subject_id.clone(),
            consents: next.consents().clone(),
            decided_at: next.decided_at,
        };
        match persisted.to_json() {
            Ok(json) => {
                if let Err(e) = self.storage.set(&self.config.storage_key, &json, None) {
                    warn!(
                        key = %self.config.storage_key,
                        error = %e,
                        "failed to persist consent record; in-memory state stands"
                    );
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to encode consent record");
            }
        }

        self.audit
            .push(ConsentEventRecord::new(action, next.consents().clone()));
        self.state = next;
    }
}
