//! # c15t-core — Foundational Types for the Consent Core
//!
//! This crate is the bedrock of the c15t consent stack. It defines the
//! type-system primitives every other crate builds on; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Single `ConsentCategory` enum.** One definition, five variants,
//!    exhaustive `match` everywhere. Adding a category forces every
//!    consumer to handle it at compile time.
//!
//! 2. **Newtype wrappers for domain primitives.** `ScriptId`, `SubjectId`,
//!    `ConsentRecordId` — validated constructors, no bare strings or UUIDs
//!    crossing crate boundaries.
//!
//! 3. **Tree-shaped category expressions.** `CategoryExpr` is a tagged
//!    union (`And`/`Or`/`Not`/leaf) evaluated by structural recursion.
//!    Expressions are trees by construction, so evaluation always
//!    terminates.
//!
//! 4. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, so persisted consent records serialize
//!    identically on every host.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `c15t-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a persistence boundary.

pub mod category;
pub mod error;
pub mod expression;
pub mod identity;
pub mod jurisdiction;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use category::{ConsentCategory, CONSENT_CATEGORY_COUNT};
pub use error::CoreError;
pub use expression::CategoryExpr;
pub use identity::{ConsentRecordId, ScriptId, SubjectId};
pub use jurisdiction::{JurisdictionCode, JurisdictionDecision};
pub use temporal::Timestamp;
