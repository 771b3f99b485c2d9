//! # Gating Engine
//!
//! Diffs the desired-loaded set against what is actually loaded on every
//! consent change and drives the lifecycle through the host seam.
//!
//! ## Invariants
//!
//! - Applying the same state twice produces no side effects: no duplicate
//!   loads, no duplicate teardowns, no repeated notifications.
//! - The engine only ever reads a fully committed `ConsentState`; it is
//!   handed snapshots by its owner, never a state mid-mutation.
//! - Scripts iterate in id order (`BTreeMap`), so reports and host
//!   interactions are deterministic for a given state.

use std::collections::BTreeMap;

use c15t_consent::ConsentState;
use c15t_core::{ConsentCategory, ScriptId, Timestamp};
use tracing::warn;

use crate::error::GatingError;
use crate::host::ScriptHost;
use crate::script::{ScriptCallback, ScriptDescriptor, ScriptEvent, ScriptPhase};

/// The load state of a registered script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The tag is injected (or the callbacks ran, for callback-only
    /// scripts) and consent currently holds.
    Active,
    /// Consent was revoked but the tag was kept; `on_delete` has been
    /// notified and the script self-manages opt-out.
    PersistedAfterRevoke,
}

/// Bookkeeping for a loaded script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedScript {
    /// When the script was loaded.
    pub at: Timestamp,
    /// Current load status.
    pub status: LoadStatus,
}

/// A caught lifecycle or host failure, attributed to one script.
#[derive(Debug, Clone)]
pub struct ScriptFailure {
    /// The script the failure belongs to.
    pub id: ScriptId,
    /// What went wrong.
    pub detail: String,
}

/// What one `apply` pass did.
#[derive(Debug, Clone, Default)]
pub struct GatingReport {
    /// Scripts newly loaded this pass, in id order.
    pub loaded: Vec<ScriptId>,
    /// Scripts torn down this pass, in id order.
    pub unloaded: Vec<ScriptId>,
    /// Persistent scripts notified of revocation this pass, in id order.
    pub notified: Vec<ScriptId>,
    /// Failures caught this pass.
    pub failures: Vec<ScriptFailure>,
}

impl GatingReport {
    /// Whether the pass had no effect at all.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
            && self.unloaded.is_empty()
            && self.notified.is_empty()
            && self.failures.is_empty()
    }
}

/// Owns the script registry and the loaded set, and drives the host.
pub struct GatingEngine {
    scripts: BTreeMap<ScriptId, ScriptDescriptor>,
    loaded: BTreeMap<ScriptId, LoadedScript>,
    host: Box<dyn ScriptHost>,
}

impl std::fmt::Debug for GatingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatingEngine")
            .field("scripts", &self.scripts.keys().collect::<Vec<_>>())
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl GatingEngine {
    /// Create an engine driving the given host.
    pub fn new(host: Box<dyn ScriptHost>) -> Self {
        Self {
            scripts: BTreeMap::new(),
            loaded: BTreeMap::new(),
            host,
        }
    }

    /// Register a script declaration.
    ///
    /// The script participates in the diff from the next `apply` on.
    pub fn register(&mut self, script: ScriptDescriptor) -> Result<(), GatingError> {
        if self.scripts.contains_key(&script.id) {
            return Err(GatingError::DuplicateScript(script.id));
        }
        self.scripts.insert(script.id.clone(), script);
        Ok(())
    }

    /// The registered script ids, in order.
    pub fn script_ids(&self) -> Vec<ScriptId> {
        self.scripts.keys().cloned().collect()
    }

    /// Whether a script is currently loaded (in either status).
    pub fn is_loaded(&self, id: &ScriptId) -> bool {
        self.loaded.contains_key(id)
    }

    /// The loaded set with its bookkeeping.
    pub fn loaded(&self) -> &BTreeMap<ScriptId, LoadedScript> {
        &self.loaded
    }

    /// Reconcile the loaded set against a committed consent state.
    ///
    /// Desired = `always_load` or the category expression holds. Newly
    /// desired scripts load (`on_before_load` → inject → `on_load`);
    /// no-longer-desired scripts tear down, or are only notified when
    /// `persist_after_revoked` is set. Every failure is caught, logged,
    /// and reported per-script; one script's failure never blocks
    /// another's evaluation.
    pub fn apply(&mut self, state: &ConsentState) -> GatingReport {
        let granted = |c: ConsentCategory| state.granted(c);
        let mut report = GatingReport::default();

        let Self {
            scripts,
            loaded,
            host,
        } = self;

        for (id, script) in scripts.iter() {
            let desired = script.always_load || script.category.evaluate(&granted);
            let status = loaded.get(id).map(|l| l.status);

            match (desired, status) {
                // Newly desired: run the load sequence.
                (true, None) => {
                    if load_script(script, host.as_mut(), &mut report) {
                        loaded.insert(
                            id.clone(),
                            LoadedScript {
                                at: Timestamp::now(),
                                status: LoadStatus::Active,
                            },
                        );
                        report.loaded.push(id.clone());
                    }
                }

                // Consent re-granted for a persisted script: the tag
                // never left the environment, so no load callbacks fire.
                (true, Some(LoadStatus::PersistedAfterRevoke)) => {
                    if let Some(entry) = loaded.get_mut(id) {
                        entry.status = LoadStatus::Active;
                    }
                }

                // Already active and still desired: nothing to do.
                (true, Some(LoadStatus::Active)) => {}

                // Revoked: tear down, or notify-only for persistent scripts.
                (false, Some(LoadStatus::Active)) => {
                    if script.persist_after_revoked {
                        fire(
                            &script.callbacks.on_delete,
                            &script.event(ScriptPhase::Deleted),
                            &mut report,
                        );
                        if let Some(entry) = loaded.get_mut(id) {
                            entry.status = LoadStatus::PersistedAfterRevoke;
                        }
                        report.notified.push(id.clone());
                    } else if unload_script(script, host.as_mut(), &mut report) {
                        loaded.remove(id);
                        report.unloaded.push(id.clone());
                    }
                }

                // Not desired and not active: nothing to do.
                (false, Some(LoadStatus::PersistedAfterRevoke)) | (false, None) => {}
            }
        }

        report
    }
}

/// Run the load sequence. Returns whether the script is now loaded.
fn load_script(
    script: &ScriptDescriptor,
    host: &mut dyn ScriptHost,
    report: &mut GatingReport,
) -> bool {
    fire(
        &script.callbacks.on_before_load,
        &script.event(ScriptPhase::BeforeLoad),
        report,
    );

    if !script.callback_only {
        if let Err(e) = host.inject(script) {
            warn!(script = %script.id, error = %e, "script injection failed; will retry");
            report.failures.push(ScriptFailure {
                id: script.id.clone(),
                detail: e.to_string(),
            });
            return false;
        }
    }

    fire(
        &script.callbacks.on_load,
        &script.event(ScriptPhase::Loaded),
        report,
    );
    true
}

/// Run the teardown sequence. Returns whether the script is now unloaded.
fn unload_script(
    script: &ScriptDescriptor,
    host: &mut dyn ScriptHost,
    report: &mut GatingReport,
) -> bool {
    if !script.callback_only {
        if let Err(e) = host.remove(&script.id) {
            warn!(script = %script.id, error = %e, "script removal failed; will retry");
            report.failures.push(ScriptFailure {
                id: script.id.clone(),
                detail: e.to_string(),
            });
            return false;
        }
    }

    fire(
        &script.callbacks.on_delete,
        &script.event(ScriptPhase::Deleted),
        report,
    );
    true
}

/// Invoke a callback if registered, catching and reporting failure.
fn fire(callback: &Option<ScriptCallback>, event: &ScriptEvent, report: &mut GatingReport) {
    let Some(callback) = callback else {
        return;
    };
    if let Err(e) = callback(event) {
        warn!(
            script = %event.script_id,
            phase = ?event.phase,
            error = %e,
            "script lifecycle callback failed"
        );
        report.failures.push(ScriptFailure {
            id: event.script_id.clone(),
            detail: e.to_string(),
        });
    }
}
