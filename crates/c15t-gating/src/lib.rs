//! # c15t-gating — Consent-Gated Script Loading
//!
//! Third-party scripts declare the consent they need as a category
//! expression; the gating engine diffs that against the current consent
//! state on every change and drives the load/teardown lifecycle through
//! the host seam.
//!
//! ## Modules
//!
//! - **script** (`script.rs`): the static declaration — id, category
//!   expression, behavior flags, lifecycle callbacks.
//! - **host** (`host.rs`): the seam to whatever owns the DOM (or other
//!   script environment), plus the no-op and recording implementations.
//! - **engine** (`engine.rs`): the diff loop. Idempotent: re-applying an
//!   unchanged state produces no side effects.
//!
//! ## Failure Model
//!
//! Integrator callbacks may fail; each failure is caught per-script,
//! logged, reported, and never blocks evaluation of other scripts. Host
//! failures leave the script in its previous load state so the next
//! apply retries.

pub mod engine;
pub mod error;
pub mod host;
pub mod script;

pub use engine::{GatingEngine, GatingReport, LoadStatus, LoadedScript, ScriptFailure};
pub use error::GatingError;
pub use host::{HostError, HostEvent, NoopHost, RecordingHost, ScriptHost};
pub use script::{ScriptCallback, ScriptCallbacks, ScriptDescriptor, ScriptEvent, ScriptPhase};
