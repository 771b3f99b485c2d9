//! # c15t-consent — The Consent Manager
//!
//! Owns the canonical consent state and every operation that mutates it.
//! Nothing else in the stack writes consent; the gating engine and UI
//! surfaces read snapshots.
//!
//! ## Modules
//!
//! - **state** (`state.rs`): `ConsentState` and its persisted wire form.
//!   Upholds the essential-category invariant in every constructor and
//!   mutator.
//! - **manager** (`manager.rs`): `ConsentManager` — set/save/reset
//!   operations, build-then-commit mutation, persistence with
//!   warn-and-continue degradation.
//! - **record** (`record.rs`): append-only audit trail of consent
//!   mutations.
//! - **banner** (`banner.rs`): the pure banner visibility policy.
//! - **detect** (`detect.rs`): the jurisdiction detection seam and its
//!   local implementations.
//!
//! ## Invariant
//!
//! The `necessary` category is granted in every reachable state. Revoking
//! it is a silent no-op, hydration from storage cannot clear it, and
//! `reset` restores it.

pub mod banner;
pub mod detect;
pub mod error;
pub mod manager;
pub mod record;
pub mod state;

pub use banner::{banner_visibility, BannerReason, BannerVisibility};
pub use detect::{ClientContext, FixedJurisdiction, JurisdictionDetector, LocationDetector};
pub use error::ConsentError;
pub use manager::{ConsentManager, SaveMode};
pub use record::{ConsentAction, ConsentEventRecord};
pub use state::{ConsentState, PersistedConsent};
