//! # Banner Visibility Policy
//!
//! A pure function of consent state, configuration, and the detected
//! jurisdiction. No I/O, no storage access, no detection calls — those
//! happen elsewhere and their results are passed in.

use c15t_config::ConsentConfig;
use c15t_core::JurisdictionDecision;
use serde::{Deserialize, Serialize};

use crate::state::ConsentState;

/// Why the policy decided to show or hide the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerReason {
    /// The user already made an explicit choice.
    DecisionAlreadyMade,
    /// A country override forces the prompt (dev/test escape hatch).
    CountryOverride,
    /// The detected jurisdiction requires consent.
    JurisdictionRequires,
    /// A regulation applies but is disabled in configuration.
    JurisdictionDisabled,
    /// No regulation requires a prompt for the resolved location.
    NoRequirement,
}

/// The policy outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerVisibility {
    /// Whether the prompt should be shown.
    pub show: bool,
    /// Why.
    pub reason: BannerReason,
}

/// Decide whether the consent prompt should be shown.
///
/// Rules, in order:
/// 1. An explicit decision hides the prompt.
/// 2. A configured country override shows it.
/// 3. A detected jurisdiction that requires consent shows it, unless its
///    compliance setting is disabled.
/// 4. Otherwise the prompt stays hidden.
pub fn banner_visibility(
    state: &ConsentState,
    config: &ConsentConfig,
    jurisdiction: &JurisdictionDecision,
) -> BannerVisibility {
    if state.decision_made {
        return BannerVisibility {
            show: false,
            reason: BannerReason::DecisionAlreadyMade,
        };
    }
    if config.overrides.country.is_some() {
        return BannerVisibility {
            show: true,
            reason: BannerReason::CountryOverride,
        };
    }
    if jurisdiction.code.requires_consent_prompt() {
        if config.compliance_for(jurisdiction.code).enabled {
            return BannerVisibility {
                show: true,
                reason: BannerReason::JurisdictionRequires,
            };
        }
        return BannerVisibility {
            show: false,
            reason: BannerReason::JurisdictionDisabled,
        };
    }
    BannerVisibility {
        show: false,
        reason: BannerReason::NoRequirement,
    }
}
