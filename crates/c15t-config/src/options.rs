//! # Consent Options & Resolved Configuration
//!
//! [`ConsentOptions`] is what integrators write — in code, YAML, or JSON,
//! possibly in several layers. [`ConsentConfig`] is what the stack reads:
//! every default applied, every invariant checked, no `Option` left where
//! a default exists.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use c15t_core::{ConsentCategory, JurisdictionCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::merge::Merge;
use crate::translations::Translations;

/// Storage key under which the consent record is persisted by default.
pub const DEFAULT_STORAGE_KEY: &str = "c15t-consent";

/// Errors raised while loading or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration could not be parsed.
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON configuration could not be parsed.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file extension is not a supported format.
    #[error("unsupported config extension: {0:?} (expected yaml, yml, or json)")]
    UnsupportedExtension(String),

    /// Hosted mode was selected without a backend URL to talk to.
    #[error("hosted mode requires backend_url")]
    MissingBackendUrl,

    /// A save-mode or mode string did not match any known value.
    #[error("unknown consent mode: {0:?}")]
    UnknownMode(String),
}

/// How the consent manager sources its configuration and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsentMode {
    /// Backed by a hosted consent service; requires `backend_url`.
    Hosted,
    /// Fully local: no network, storage backend only.
    #[default]
    Offline,
    /// Integrator supplies their own collaborators for every seam.
    Custom,
}

impl ConsentMode {
    /// Returns the lowercase identifier for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hosted => "hosted",
            Self::Offline => "offline",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ConsentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hosted" => Ok(Self::Hosted),
            "offline" => Ok(Self::Offline),
            "custom" => Ok(Self::Custom),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// Explicit overrides for detection inputs.
///
/// Setting `country` forces the consent prompt to show regardless of what
/// detection would conclude — a development and testing escape hatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Overrides {
    /// Force the resolved country (ISO-3166-1 alpha-2).
    pub country: Option<String>,
    /// Force the resolved sub-national region.
    pub region: Option<String>,
    /// Force the banner language.
    pub language: Option<String>,
}

impl Merge for Overrides {
    fn merge(self, overlay: Self) -> Self {
        Self {
            country: self.country.merge(overlay.country),
            region: self.region.merge(overlay.region),
            language: self.language.merge(overlay.language),
        }
    }
}

/// Per-jurisdiction compliance toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceSetting {
    /// Whether this jurisdiction's requirements are honored.
    pub enabled: bool,
    /// Whether the jurisdiction's rules are applied to every visitor,
    /// not only those resolved to it.
    pub applies_globally: bool,
}

impl Default for ComplianceSetting {
    fn default() -> Self {
        Self {
            enabled: true,
            applies_globally: false,
        }
    }
}

/// Integrator-supplied options; every field optional where a default
/// exists. Layers combine via [`Merge`] before resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsentOptions {
    /// Operating mode; defaults to offline.
    pub mode: Option<ConsentMode>,
    /// Hosted backend endpoint. Required when `mode` is hosted.
    pub backend_url: Option<String>,
    /// Categories offered to the user. `necessary` is always included.
    pub categories: Option<Vec<ConsentCategory>>,
    /// Detection overrides.
    pub overrides: Overrides,
    /// Per-jurisdiction compliance toggles; unset jurisdictions get the
    /// default (enabled wherever a prompt is required).
    pub compliance: BTreeMap<JurisdictionCode, ComplianceSetting>,
    /// Storage key for the persisted record.
    pub storage_key: Option<String>,
    /// Banner text bundles.
    pub translations: Option<Translations>,
}

impl ConsentOptions {
    /// Parse options from a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse options from a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load options from a file, dispatching on the extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(ConfigError::UnsupportedExtension(
                other.unwrap_or("").to_string(),
            )),
        }
    }

    /// Resolve these options into a total configuration.
    pub fn resolve(self) -> Result<ConsentConfig, ConfigError> {
        ConsentConfig::resolve(self)
    }
}

impl Merge for ConsentOptions {
    fn merge(self, overlay: Self) -> Self {
        Self {
            mode: self.mode.merge(overlay.mode),
            backend_url: self.backend_url.merge(overlay.backend_url),
            categories: self.categories.merge(overlay.categories),
            overrides: self.overrides.merge(overlay.overrides),
            compliance: self.compliance.merge(overlay.compliance),
            storage_key: self.storage_key.merge(overlay.storage_key),
            translations: self.translations.merge(overlay.translations),
        }
    }
}

/// Fully resolved configuration. Constructed only through
/// [`ConsentOptions::resolve`]; construction enforces the mode/URL
/// pairing and the essential-category guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentConfig {
    /// Operating mode.
    pub mode: ConsentMode,
    /// Hosted backend endpoint; present exactly when `mode` is hosted.
    pub backend_url: Option<String>,
    /// Categories offered to the user, in canonical order, `necessary`
    /// always present.
    pub categories: Vec<ConsentCategory>,
    /// Detection overrides.
    pub overrides: Overrides,
    /// Compliance toggles, populated for every jurisdiction code.
    pub compliance: BTreeMap<JurisdictionCode, ComplianceSetting>,
    /// Storage key for the persisted record.
    pub storage_key: String,
    /// Banner text bundles.
    pub translations: Translations,
}

impl ConsentConfig {
    fn resolve(options: ConsentOptions) -> Result<Self, ConfigError> {
        let mode = options.mode.unwrap_or_default();
        if mode == ConsentMode::Hosted && options.backend_url.is_none() {
            return Err(ConfigError::MissingBackendUrl);
        }

        // Canonical-order category list with `necessary` forced in.
        let requested = options
            .categories
            .unwrap_or_else(|| ConsentCategory::all_categories().to_vec());
        let categories: Vec<ConsentCategory> = ConsentCategory::all_categories()
            .iter()
            .copied()
            .filter(|c| c.is_essential() || requested.contains(c))
            .collect();

        // Every jurisdiction gets a setting; integrator entries win.
        let compliance = default_compliance().merge(options.compliance);

        Ok(Self {
            mode,
            backend_url: options.backend_url,
            categories,
            overrides: options.overrides,
            compliance,
            storage_key: options
                .storage_key
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            translations: options.translations.unwrap_or_default(),
        })
    }

    /// The compliance setting for a jurisdiction (default if untracked).
    pub fn compliance_for(&self, code: JurisdictionCode) -> ComplianceSetting {
        self.compliance.get(&code).copied().unwrap_or_default()
    }

    /// Default configuration (offline mode, all categories).
    pub fn defaults() -> Self {
        Self {
            mode: ConsentMode::Offline,
            backend_url: None,
            categories: ConsentCategory::all_categories().to_vec(),
            overrides: Overrides::default(),
            compliance: default_compliance(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            translations: Translations::default(),
        }
    }
}

/// Enabled settings for every jurisdiction that requires a prompt.
fn default_compliance() -> BTreeMap<JurisdictionCode, ComplianceSetting> {
    JurisdictionCode::all_codes()
        .iter()
        .filter(|code| code.requires_consent_prompt())
        .map(|code| (*code, ComplianceSetting::default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsentConfig::defaults();
        assert_eq!(config.mode, ConsentMode::Offline);
        assert_eq!(config.categories, ConsentCategory::all_categories());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.compliance[&JurisdictionCode::Gdpr].enabled);
        assert!(!config.compliance.contains_key(&JurisdictionCode::None));
    }

    #[test]
    fn test_hosted_mode_requires_backend_url() {
        let options = ConsentOptions {
            mode: Some(ConsentMode::Hosted),
            ..Default::default()
        };
        assert!(matches!(
            options.resolve(),
            Err(ConfigError::MissingBackendUrl)
        ));

        let options = ConsentOptions {
            mode: Some(ConsentMode::Hosted),
            backend_url: Some("https://consent.example.com".to_string()),
            ..Default::default()
        };
        assert!(options.resolve().is_ok());
    }

    #[test]
    fn test_necessary_is_forced_into_categories() {
        let options = ConsentOptions {
            categories: Some(vec![ConsentCategory::Marketing]),
            ..Default::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(
            config.categories,
            vec![ConsentCategory::Necessary, ConsentCategory::Marketing]
        );
    }

    #[test]
    fn test_categories_normalize_to_canonical_order() {
        let options = ConsentOptions {
            categories: Some(vec![
                ConsentCategory::Marketing,
                ConsentCategory::Functionality,
            ]),
            ..Default::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(
            config.categories,
            vec![
                ConsentCategory::Necessary,
                ConsentCategory::Functionality,
                ConsentCategory::Marketing
            ]
        );
    }

    #[test]
    fn test_integrator_compliance_overrides_default() {
        let mut compliance = BTreeMap::new();
        compliance.insert(
            JurisdictionCode::Au,
            ComplianceSetting {
                enabled: false,
                applies_globally: false,
            },
        );
        let config = ConsentOptions {
            compliance,
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert!(!config.compliance[&JurisdictionCode::Au].enabled);
        assert!(config.compliance[&JurisdictionCode::Gdpr].enabled);
    }

    #[test]
    fn test_merge_overlay_wins() {
        let base = ConsentOptions {
            mode: Some(ConsentMode::Offline),
            storage_key: Some("base-key".to_string()),
            ..Default::default()
        };
        let overlay = ConsentOptions {
            storage_key: Some("overlay-key".to_string()),
            overrides: Overrides {
                country: Some("DE".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = base.merge(overlay);
        assert_eq!(merged.mode, Some(ConsentMode::Offline));
        assert_eq!(merged.storage_key.as_deref(), Some("overlay-key"));
        assert_eq!(merged.overrides.country.as_deref(), Some("DE"));
    }

    #[test]
    fn test_from_yaml() {
        let options = ConsentOptions::from_yaml_str(
            r#"
mode: offline
categories: [necessary, marketing]
overrides:
  country: DE
compliance:
  GDPR:
    enabled: true
    applies_globally: true
"#,
        )
        .unwrap();
        assert_eq!(options.mode, Some(ConsentMode::Offline));
        assert_eq!(options.overrides.country.as_deref(), Some("DE"));
        assert!(options.compliance[&JurisdictionCode::Gdpr].applies_globally);
    }

    #[test]
    fn test_from_json() {
        let options = ConsentOptions::from_json_str(
            r#"{"mode": "hosted", "backend_url": "https://consent.example.com"}"#,
        )
        .unwrap();
        assert_eq!(options.mode, Some(ConsentMode::Hosted));
    }

    #[test]
    fn test_from_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("c15t.yaml");
        std::fs::write(&yaml_path, "mode: custom\n").unwrap();
        let options = ConsentOptions::from_file(&yaml_path).unwrap();
        assert_eq!(options.mode, Some(ConsentMode::Custom));

        let txt_path = dir.path().join("c15t.txt");
        std::fs::write(&txt_path, "mode: custom\n").unwrap();
        assert!(matches!(
            ConsentOptions::from_file(&txt_path),
            Err(ConfigError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("hosted".parse::<ConsentMode>().unwrap(), ConsentMode::Hosted);
        assert!("managed".parse::<ConsentMode>().is_err());
    }
}
