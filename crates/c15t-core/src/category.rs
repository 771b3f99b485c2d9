//! # Consent Category — Single Source of Truth
//!
//! Defines the `ConsentCategory` enum with all five processing categories.
//! This is the ONE definition used across the entire stack. Every `match`
//! on `ConsentCategory` must be exhaustive — adding a new category forces
//! every consumer to handle it at compile time.
//!
//! ## Invariant
//!
//! `Necessary` is the only essential category. It is granted in every
//! reachable consent state and can never be revoked; the consent manager
//! enforces this, and `is_essential()` is how it asks.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// A named class of data processing a user can grant or deny.
///
/// Each category gates an independent set of integrations: a script or
/// tag declares which categories it needs, and only loads once every one
/// of them is granted.
///
/// # Categories
///
/// | # | Category | Gates |
/// |---|----------|-------|
/// | 1 | Necessary | Core functionality; always granted |
/// | 2 | Functionality | Preference and feature enhancements |
/// | 3 | Experience | Personalization, A/B surfaces |
/// | 4 | Measurement | Analytics and performance telemetry |
/// | 5 | Marketing | Advertising, retargeting, attribution |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentCategory {
    /// Core functionality the product cannot run without. Always granted.
    Necessary,
    /// Preference and feature enhancements (saved settings, chat widgets).
    Functionality,
    /// Personalization and experience surfaces (A/B tests, recommendations).
    Experience,
    /// Analytics and performance measurement.
    Measurement,
    /// Advertising, retargeting, and attribution.
    Marketing,
}

/// Total number of consent categories. Used for compile-time assertions.
pub const CONSENT_CATEGORY_COUNT: usize = 5;

impl ConsentCategory {
    /// Returns all five categories in canonical order.
    pub fn all_categories() -> &'static [ConsentCategory] {
        &[
            Self::Necessary,
            Self::Functionality,
            Self::Experience,
            Self::Measurement,
            Self::Marketing,
        ]
    }

    /// Whether this category is essential and therefore always granted.
    pub fn is_essential(&self) -> bool {
        matches!(self, Self::Necessary)
    }

    /// Returns the lowercase string identifier for this category.
    ///
    /// This must match the serde serialization format and the identifiers
    /// used in persisted consent records and script declarations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Necessary => "necessary",
            Self::Functionality => "functionality",
            Self::Experience => "experience",
            Self::Measurement => "measurement",
            Self::Marketing => "marketing",
        }
    }
}

impl std::fmt::Display for ConsentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentCategory {
    type Err = CoreError;

    /// Parse a consent category from its lowercase string identifier.
    ///
    /// Accepts the same identifiers produced by [`ConsentCategory::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "necessary" => Ok(Self::Necessary),
            "functionality" => Ok(Self::Functionality),
            "experience" => Ok(Self::Experience),
            "measurement" => Ok(Self::Measurement),
            "marketing" => Ok(Self::Marketing),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_categories_count() {
        assert_eq!(
            ConsentCategory::all_categories().len(),
            CONSENT_CATEGORY_COUNT
        );
    }

    #[test]
    fn test_all_categories_unique() {
        let mut seen = std::collections::HashSet::new();
        for c in ConsentCategory::all_categories() {
            assert!(seen.insert(c), "Duplicate category: {c}");
        }
    }

    #[test]
    fn test_only_necessary_is_essential() {
        for c in ConsentCategory::all_categories() {
            assert_eq!(c.is_essential(), *c == ConsentCategory::Necessary);
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for category in ConsentCategory::all_categories() {
            let s = category.as_str();
            let parsed: ConsentCategory = s
                .parse()
                .unwrap_or_else(|e| panic!("Failed to parse {s:?}: {e}"));
            assert_eq!(*category, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("nonexistent".parse::<ConsentCategory>().is_err());
        assert!("Marketing".parse::<ConsentCategory>().is_err()); // case-sensitive
        assert!("".parse::<ConsentCategory>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for category in ConsentCategory::all_categories() {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let parsed: ConsentCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(*category, parsed);
        }
    }

    #[test]
    fn test_display_matches_as_str() {
        for category in ConsentCategory::all_categories() {
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn test_exhaustive_match_compiles() {
        // Adding a new category variant causes a compile error here,
        // forcing the developer to update all match arms.
        fn category_description(c: &ConsentCategory) -> &'static str {
            match c {
                ConsentCategory::Necessary => "core functionality",
                ConsentCategory::Functionality => "feature enhancements",
                ConsentCategory::Experience => "personalization",
                ConsentCategory::Measurement => "analytics",
                ConsentCategory::Marketing => "advertising",
            }
        }
        for c in ConsentCategory::all_categories() {
            assert!(!category_description(c).is_empty());
        }
    }
}
