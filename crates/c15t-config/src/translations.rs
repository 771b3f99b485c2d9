//! # Banner Translations
//!
//! Typed text bundles for the consent surface, keyed by language tag.
//! Resolution walks a fixed fallback chain: requested language → the
//! configured default language → `"en"` → the built-in English bundle.
//! Falling back to the built-in bundle is logged as a warning; it means
//! shipped content is missing, but the banner still renders lawful text.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use c15t_core::ConsentCategory;
use serde::{Deserialize, Serialize};

/// Display text for a single consent category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryText {
    /// Short label shown next to the category toggle.
    pub name: String,
    /// One-sentence description of what granting the category allows.
    pub description: String,
}

/// All banner strings for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationBundle {
    /// Banner headline.
    pub title: String,
    /// Banner body copy.
    pub description: String,
    /// Label of the accept-everything action.
    pub accept_all: String,
    /// Label of the necessary-only action.
    pub reject_all: String,
    /// Label of the open-preferences action.
    pub customize: String,
    /// Label of the save action inside the preferences dialog.
    pub save: String,
    /// Per-category labels and descriptions.
    pub categories: BTreeMap<ConsentCategory, CategoryText>,
}

impl TranslationBundle {
    /// The built-in English bundle used as the last fallback.
    pub fn english() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(
            ConsentCategory::Necessary,
            CategoryText {
                name: "Necessary".to_string(),
                description: "Required for the site to function. Always active.".to_string(),
            },
        );
        categories.insert(
            ConsentCategory::Functionality,
            CategoryText {
                name: "Functionality".to_string(),
                description: "Remembers your settings and preferences.".to_string(),
            },
        );
        categories.insert(
            ConsentCategory::Experience,
            CategoryText {
                name: "Experience".to_string(),
                description: "Personalizes content and features.".to_string(),
            },
        );
        categories.insert(
            ConsentCategory::Measurement,
            CategoryText {
                name: "Measurement".to_string(),
                description: "Helps us understand how the site is used.".to_string(),
            },
        );
        categories.insert(
            ConsentCategory::Marketing,
            CategoryText {
                name: "Marketing".to_string(),
                description: "Used to show relevant advertising.".to_string(),
            },
        );
        Self {
            title: "We value your privacy".to_string(),
            description: "This site uses cookies to improve your browsing experience, \
                          analyze site traffic, and show personalized content."
                .to_string(),
            accept_all: "Accept all".to_string(),
            reject_all: "Reject all".to_string(),
            customize: "Customize".to_string(),
            save: "Save preferences".to_string(),
            categories,
        }
    }
}

fn builtin_english() -> &'static TranslationBundle {
    static BUILTIN: OnceLock<TranslationBundle> = OnceLock::new();
    BUILTIN.get_or_init(TranslationBundle::english)
}

/// Language-keyed translation table with a configured default language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translations {
    /// Language used when the requested one is absent.
    pub default_language: String,
    /// Bundles keyed by primary language subtag (`"en"`, `"de"`, ...).
    pub bundles: BTreeMap<String, TranslationBundle>,
}

impl Default for Translations {
    fn default() -> Self {
        let mut bundles = BTreeMap::new();
        bundles.insert("en".to_string(), TranslationBundle::english());
        Self {
            default_language: "en".to_string(),
            bundles,
        }
    }
}

impl Translations {
    /// Resolve the bundle for a requested language.
    ///
    /// Walks requested → default → `"en"` → built-in. Language tags are
    /// matched on their primary subtag, so `"de-AT"` resolves the `"de"`
    /// bundle.
    pub fn resolve(&self, language: Option<&str>) -> &TranslationBundle {
        let candidates = [
            language.map(normalize_language),
            Some(normalize_language(&self.default_language)),
            Some("en".to_string()),
        ];
        for candidate in candidates.into_iter().flatten() {
            if let Some(bundle) = self.bundles.get(&candidate) {
                return bundle;
            }
        }
        tracing::warn!(
            requested = language.unwrap_or("<none>"),
            default = %self.default_language,
            "no translation bundle found; falling back to built-in English"
        );
        builtin_english()
    }
}

/// Lowercase the tag and keep only the primary subtag.
fn normalize_language(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or(tag)
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn german_bundle() -> TranslationBundle {
        TranslationBundle {
            title: "Wir respektieren Ihre Privatsphäre".to_string(),
            ..TranslationBundle::english()
        }
    }

    #[test]
    fn test_resolves_requested_language() {
        let mut translations = Translations::default();
        translations
            .bundles
            .insert("de".to_string(), german_bundle());
        let bundle = translations.resolve(Some("de"));
        assert_eq!(bundle.title, "Wir respektieren Ihre Privatsphäre");
    }

    #[test]
    fn test_region_subtag_is_ignored() {
        let mut translations = Translations::default();
        translations
            .bundles
            .insert("de".to_string(), german_bundle());
        let bundle = translations.resolve(Some("de-AT"));
        assert_eq!(bundle.title, "Wir respektieren Ihre Privatsphäre");
    }

    #[test]
    fn test_falls_back_to_default_language() {
        let mut translations = Translations::default();
        translations.default_language = "de".to_string();
        translations
            .bundles
            .insert("de".to_string(), german_bundle());
        let bundle = translations.resolve(Some("fr"));
        assert_eq!(bundle.title, "Wir respektieren Ihre Privatsphäre");
    }

    #[test]
    fn test_falls_back_to_english_bundle() {
        let translations = Translations::default();
        let bundle = translations.resolve(Some("fr"));
        assert_eq!(bundle.title, "We value your privacy");
    }

    #[test]
    fn test_falls_back_to_builtin_when_table_empty() {
        let translations = Translations {
            default_language: "de".to_string(),
            bundles: BTreeMap::new(),
        };
        let bundle = translations.resolve(Some("fr"));
        assert_eq!(bundle, builtin_english());
    }

    #[test]
    fn test_builtin_covers_every_category() {
        let bundle = TranslationBundle::english();
        for category in ConsentCategory::all_categories() {
            assert!(
                bundle.categories.contains_key(category),
                "missing text for {category}"
            );
        }
    }
}
