//! # c15t-store — The Reactive Consent Store
//!
//! The top of the dependency DAG. Assembles the consent manager, the
//! banner visibility policy, jurisdiction detection, and the gating
//! engine behind a single subscribable surface for UI bindings.
//!
//! ## Execution Model
//!
//! One mutex serializes every mutation end-to-end: a mutation's
//! read-modify-write, its persistence attempt, and the gating diff all
//! complete before the next mutation starts. Listeners are notified
//! synchronously after commit, in subscription order, with the lock
//! released — a listener may call back into the store without
//! deadlocking.
//!
//! ## No Process-Global State
//!
//! Everything — including the overlay (scroll-lock) counter — is owned
//! by the store instance. Two stores in one process cannot leak state
//! into each other.

pub mod overlay;
pub mod store;

pub use overlay::{OverlayGuard, OverlayLock};
pub use store::{ConsentStore, ConsentStoreBuilder, StoreError, SubscriptionId};
