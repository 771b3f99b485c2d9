//! # Jurisdiction Detection Seam
//!
//! Geolocation is an external collaborator: something upstream resolves
//! the client to a country (edge headers, a lookup service, a fixture).
//! This module defines the seam and the two local implementations —
//! classification itself lives in `c15t_core::jurisdiction`.

use c15t_config::Overrides;
use c15t_core::{JurisdictionCode, JurisdictionDecision};
use serde::{Deserialize, Serialize};

/// What is known about the client when detection runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientContext {
    /// ISO-3166-1 alpha-2 country code, if resolved.
    pub country: Option<String>,
    /// Sub-national region code, if resolved.
    pub region: Option<String>,
    /// Preferred language tag, if known.
    pub language: Option<String>,
}

/// Resolves a client context to a jurisdiction decision.
///
/// Implementations must be pure with respect to consent state — detection
/// never reads or writes consent.
pub trait JurisdictionDetector: Send + Sync {
    /// Classify the client.
    fn detect(&self, ctx: &ClientContext) -> JurisdictionDecision;
}

/// Detection from resolved location, honoring configured overrides.
///
/// An override country takes precedence over the context's; with neither
/// present the decision is [`JurisdictionCode::None`].
#[derive(Debug, Clone, Default)]
pub struct LocationDetector {
    overrides: Overrides,
}

impl LocationDetector {
    /// Build a detector honoring the given overrides.
    pub fn new(overrides: Overrides) -> Self {
        Self { overrides }
    }
}

impl JurisdictionDetector for LocationDetector {
    fn detect(&self, ctx: &ClientContext) -> JurisdictionDecision {
        let country = self
            .overrides
            .country
            .as_deref()
            .or(ctx.country.as_deref());
        JurisdictionDecision::from_code(JurisdictionCode::from_country(country))
    }
}

/// A detector that always answers with a fixed code. Test and
/// development escape hatch.
#[derive(Debug, Clone)]
pub struct FixedJurisdiction(pub JurisdictionCode);

impl JurisdictionDetector for FixedJurisdiction {
    fn detect(&self, _ctx: &ClientContext) -> JurisdictionDecision {
        JurisdictionDecision::from_code(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_detector_uses_context_country() {
        let detector = LocationDetector::default();
        let ctx = ClientContext {
            country: Some("DE".to_string()),
            ..Default::default()
        };
        assert_eq!(detector.detect(&ctx).code, JurisdictionCode::Gdpr);
    }

    #[test]
    fn test_override_country_wins() {
        let detector = LocationDetector::new(Overrides {
            country: Some("BR".to_string()),
            ..Default::default()
        });
        let ctx = ClientContext {
            country: Some("US".to_string()),
            ..Default::default()
        };
        assert_eq!(detector.detect(&ctx).code, JurisdictionCode::Br);
    }

    #[test]
    fn test_unknown_location_is_unregulated() {
        let detector = LocationDetector::default();
        assert_eq!(
            detector.detect(&ClientContext::default()).code,
            JurisdictionCode::None
        );
    }

    #[test]
    fn test_fixed_detector() {
        let detector = FixedJurisdiction(JurisdictionCode::Appi);
        assert_eq!(
            detector.detect(&ClientContext::default()).code,
            JurisdictionCode::Appi
        );
    }
}
