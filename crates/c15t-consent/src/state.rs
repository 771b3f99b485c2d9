//! # Consent State
//!
//! The canonical state owned by the consent manager: per-category grants,
//! the decided/undecided distinction, prompt visibility, and the
//! compliance toggles the banner policy reads.
//!
//! ## Invariant
//!
//! `consents[Necessary]` is `true` in every reachable state. The grant
//! map is private; every way of changing it refuses to clear the
//! essential category.

use std::collections::BTreeMap;

use c15t_config::{ComplianceSetting, ConsentConfig};
use c15t_core::{ConsentCategory, ConsentRecordId, JurisdictionCode, SubjectId, Timestamp};
use serde::{Deserialize, Serialize};

/// The canonical consent state.
///
/// Distinguishes "no decision yet" (`decision_made == false`, prompt
/// pending) from an explicit user choice. Mutated exclusively through
/// [`crate::ConsentManager`] operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentState {
    consents: BTreeMap<ConsentCategory, bool>,
    /// Whether the user has explicitly chosen (vs. defaults in effect).
    pub decision_made: bool,
    /// Whether the consent prompt should currently be visible.
    pub show_popup: bool,
    /// True until the initial storage read settles.
    pub loading: bool,
    /// When the user last made an explicit choice.
    pub decided_at: Option<Timestamp>,
    /// Jurisdiction-specific toggles, copied from configuration.
    pub compliance: BTreeMap<JurisdictionCode, ComplianceSetting>,
}

impl ConsentState {
    /// The pre-decision default state for a configuration: every offered
    /// non-essential category ungranted, `Necessary` granted, no decision
    /// recorded, loading until the storage read settles.
    pub fn defaults(config: &ConsentConfig) -> Self {
        let consents = config
            .categories
            .iter()
            .map(|c| (*c, c.is_essential()))
            .collect();
        Self {
            consents,
            decision_made: false,
            show_popup: false,
            loading: true,
            decided_at: None,
            compliance: config.compliance.clone(),
        }
    }

    /// Whether a category is currently granted. Categories the
    /// configuration does not offer report `false`.
    pub fn granted(&self, category: ConsentCategory) -> bool {
        self.consents.get(&category).copied().unwrap_or(false)
    }

    /// Whether a category is offered by this state's configuration.
    pub fn tracks(&self, category: ConsentCategory) -> bool {
        self.consents.contains_key(&category)
    }

    /// Read-only view of the grant map.
    pub fn consents(&self) -> &BTreeMap<ConsentCategory, bool> {
        &self.consents
    }

    /// An owned immutable copy of this state.
    pub fn snapshot(&self) -> ConsentState {
        self.clone()
    }

    /// Set a single grant. Refuses to clear the essential category and
    /// ignores categories the configuration does not offer; returns
    /// whether the map changed.
    pub(crate) fn set_grant(&mut self, category: ConsentCategory, granted: bool) -> bool {
        if category.is_essential() && !granted {
            return false;
        }
        match self.consents.get_mut(&category) {
            Some(slot) => {
                let changed = *slot != granted;
                *slot = granted;
                changed
            }
            None => false,
        }
    }

    /// Grant every offered category.
    pub(crate) fn grant_all(&mut self) {
        for granted in self.consents.values_mut() {
            *granted = true;
        }
    }

    /// Grant only the essential category.
    pub(crate) fn grant_only_essential(&mut self) {
        for (category, granted) in self.consents.iter_mut() {
            *granted = category.is_essential();
        }
    }
}

/// The wire form written to the storage backend.
///
/// Carries identity for auditability: which anonymous subject decided,
/// under which record id, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedConsent {
    /// Identifier of this persisted record.
    pub record_id: ConsentRecordId,
    /// The anonymous subject the record belongs to.
    pub subject_id: SubjectId,
    /// The decided grants.
    pub consents: BTreeMap<ConsentCategory, bool>,
    /// When the decision was made.
    pub decided_at: Option<Timestamp>,
}

impl PersistedConsent {
    /// Encode to the stored JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from the stored JSON document.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_state() -> ConsentState {
        ConsentState::defaults(&ConsentConfig::defaults())
    }

    #[test]
    fn test_defaults_grant_only_necessary() {
        let state = default_state();
        assert!(state.granted(ConsentCategory::Necessary));
        assert!(!state.granted(ConsentCategory::Marketing));
        assert!(!state.granted(ConsentCategory::Measurement));
        assert!(!state.decision_made);
        assert!(state.loading);
    }

    #[test]
    fn test_set_grant_refuses_clearing_necessary() {
        let mut state = default_state();
        assert!(!state.set_grant(ConsentCategory::Necessary, false));
        assert!(state.granted(ConsentCategory::Necessary));
    }

    #[test]
    fn test_set_grant_ignores_unoffered_category() {
        let config = ConsentConfig::defaults();
        let mut options_config = config;
        options_config.categories =
            vec![ConsentCategory::Necessary, ConsentCategory::Marketing];
        let mut state = ConsentState::defaults(&options_config);
        assert!(!state.tracks(ConsentCategory::Experience));
        assert!(!state.set_grant(ConsentCategory::Experience, true));
        assert!(!state.granted(ConsentCategory::Experience));
    }

    #[test]
    fn test_grant_all_and_only_essential() {
        let mut state = default_state();
        state.grant_all();
        for category in ConsentCategory::all_categories() {
            assert!(state.granted(*category));
        }
        state.grant_only_essential();
        for category in ConsentCategory::all_categories() {
            assert_eq!(state.granted(*category), category.is_essential());
        }
    }

    #[test]
    fn test_persisted_roundtrip() {
        let record = PersistedConsent {
            record_id: ConsentRecordId::new(),
            subject_id: SubjectId::new(),
            consents: default_state().consents().clone(),
            decided_at: Some(Timestamp::from_epoch_secs(1_700_000_000).unwrap()),
        };
        let json = record.to_json().unwrap();
        let back = PersistedConsent::from_json(&json).unwrap();
        assert_eq!(back, record);
    }
}
