//! # c15t-config — Configuration Resolution
//!
//! Turns whatever the integrator supplies (code, YAML, JSON, layered
//! overlays) into one fully resolved [`ConsentConfig`] the rest of the
//! stack reads.
//!
//! ## Design
//!
//! - **Partial in, total out.** [`ConsentOptions`] is all optional fields;
//!   [`ConsentConfig`] has no `Option` where a default exists. Resolution
//!   happens exactly once, at the boundary.
//! - **Typed merge.** Overlays combine through the [`Merge`] trait with
//!   explicit precedence (overlay wins, `None` preserves the base, maps
//!   merge key-wise). There is no duck-typed deep merge and no runtime
//!   type inspection.
//! - **Translations are content, not structure.** A missing translation
//!   falls back down the language chain and ultimately to the built-in
//!   English bundle, with a warning — the banner must still render
//!   something lawful.

pub mod merge;
pub mod options;
pub mod translations;

pub use merge::Merge;
pub use options::{
    ComplianceSetting, ConfigError, ConsentConfig, ConsentMode, ConsentOptions, Overrides,
    DEFAULT_STORAGE_KEY,
};
pub use translations::{CategoryText, TranslationBundle, Translations};
