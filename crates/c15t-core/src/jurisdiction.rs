//! # Jurisdiction Types
//!
//! Defines the jurisdiction code enumeration used to decide whether a
//! consent prompt is legally required, and the mapping from ISO-3166-1
//! country codes to those jurisdictions.
//!
//! Geolocation itself is an external collaborator — something upstream
//! resolves the client to a country code (request headers, an edge
//! function, a fixed override). This module only classifies the result.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// EU and EEA member states plus the United Kingdom, all of which apply
/// GDPR or an equivalent regime.
const GDPR_COUNTRIES: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE", // EU 27
    "IS", "LI", "NO", // EEA
    "GB", // UK GDPR
];

/// A legal region classification that determines consent requirements.
///
/// `None` means no known regulation requires a prompt for the resolved
/// location; every other code does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JurisdictionCode {
    /// EU/EEA/UK General Data Protection Regulation.
    Gdpr,
    /// Switzerland — revised Federal Act on Data Protection.
    Ch,
    /// Brazil — Lei Geral de Proteção de Dados (LGPD).
    Br,
    /// Canada — PIPEDA.
    Pipeda,
    /// Australia — Privacy Act.
    Au,
    /// Japan — Act on the Protection of Personal Information.
    Appi,
    /// South Korea — Personal Information Protection Act.
    Pipa,
    /// No consent regulation applies to the resolved location.
    None,
}

impl JurisdictionCode {
    /// Returns all jurisdiction codes in canonical order.
    pub fn all_codes() -> &'static [JurisdictionCode] {
        &[
            Self::Gdpr,
            Self::Ch,
            Self::Br,
            Self::Pipeda,
            Self::Au,
            Self::Appi,
            Self::Pipa,
            Self::None,
        ]
    }

    /// Whether this jurisdiction legally requires a consent prompt.
    pub fn requires_consent_prompt(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Classify an ISO-3166-1 alpha-2 country code.
    ///
    /// An absent or unrecognized country resolves to [`Self::None`]:
    /// without a positive signal that a regulation applies, no prompt is
    /// required.
    pub fn from_country(country: Option<&str>) -> Self {
        let Some(country) = country else {
            return Self::None;
        };
        let country = country.trim().to_ascii_uppercase();
        if GDPR_COUNTRIES.contains(&country.as_str()) {
            return Self::Gdpr;
        }
        match country.as_str() {
            "CH" => Self::Ch,
            "BR" => Self::Br,
            "CA" => Self::Pipeda,
            "AU" => Self::Au,
            "JP" => Self::Appi,
            "KR" => Self::Pipa,
            _ => Self::None,
        }
    }

    /// Returns the wire-format identifier for this code (e.g. `"GDPR"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gdpr => "GDPR",
            Self::Ch => "CH",
            Self::Br => "BR",
            Self::Pipeda => "PIPEDA",
            Self::Au => "AU",
            Self::Appi => "APPI",
            Self::Pipa => "PIPA",
            Self::None => "NONE",
        }
    }

    /// Human-readable statement of why a prompt is (or is not) required.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Gdpr => "GDPR or equivalent regulations require a consent prompt.",
            Self::Ch => "Switzerland's data protection law requires a consent prompt.",
            Self::Br => "Brazil's LGPD requires a consent prompt.",
            Self::Pipeda => "PIPEDA or equivalent regulations require a consent prompt.",
            Self::Au => "Australia's Privacy Act mandates transparency about data collection.",
            Self::Appi => "Japan's APPI requires consent for data collection.",
            Self::Pipa => "South Korea's PIPA requires consent for data collection.",
            Self::None => "No specific consent requirements apply.",
        }
    }
}

impl std::fmt::Display for JurisdictionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JurisdictionCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GDPR" => Ok(Self::Gdpr),
            "CH" => Ok(Self::Ch),
            "BR" => Ok(Self::Br),
            "PIPEDA" => Ok(Self::Pipeda),
            "AU" => Ok(Self::Au),
            "APPI" => Ok(Self::Appi),
            "PIPA" => Ok(Self::Pipa),
            "NONE" => Ok(Self::None),
            other => Err(CoreError::UnknownJurisdiction(other.to_string())),
        }
    }
}

/// The outcome of jurisdiction detection, handed to the banner policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionDecision {
    /// The resolved jurisdiction code.
    pub code: JurisdictionCode,
    /// Why the code was chosen; surfaced to integrators for debugging.
    pub message: String,
}

impl JurisdictionDecision {
    /// Build a decision carrying the code's canonical message.
    pub fn from_code(code: JurisdictionCode) -> Self {
        Self {
            code,
            message: code.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_roundtrip() {
        for code in JurisdictionCode::all_codes() {
            let parsed: JurisdictionCode = code.as_str().parse().unwrap();
            assert_eq!(*code, parsed);
        }
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for code in JurisdictionCode::all_codes() {
            let json = serde_json::to_string(code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_only_none_waives_prompt() {
        for code in JurisdictionCode::all_codes() {
            assert_eq!(
                code.requires_consent_prompt(),
                *code != JurisdictionCode::None
            );
        }
    }

    #[test]
    fn test_country_mapping() {
        let cases = [
            (Some("DE"), JurisdictionCode::Gdpr),
            (Some("FR"), JurisdictionCode::Gdpr),
            (Some("NO"), JurisdictionCode::Gdpr),
            (Some("GB"), JurisdictionCode::Gdpr),
            (Some("CH"), JurisdictionCode::Ch),
            (Some("BR"), JurisdictionCode::Br),
            (Some("CA"), JurisdictionCode::Pipeda),
            (Some("AU"), JurisdictionCode::Au),
            (Some("JP"), JurisdictionCode::Appi),
            (Some("KR"), JurisdictionCode::Pipa),
            (Some("US"), JurisdictionCode::None),
            (Some("??"), JurisdictionCode::None),
            (None, JurisdictionCode::None),
        ];
        for (country, expected) in cases {
            assert_eq!(
                JurisdictionCode::from_country(country),
                expected,
                "country {country:?}"
            );
        }
    }

    #[test]
    fn test_country_mapping_normalizes_case() {
        assert_eq!(
            JurisdictionCode::from_country(Some("de")),
            JurisdictionCode::Gdpr
        );
        assert_eq!(
            JurisdictionCode::from_country(Some(" jp ")),
            JurisdictionCode::Appi
        );
    }

    #[test]
    fn test_decision_carries_message() {
        let decision = JurisdictionDecision::from_code(JurisdictionCode::Gdpr);
        assert_eq!(decision.code, JurisdictionCode::Gdpr);
        assert!(decision.message.contains("GDPR"));
    }
}
