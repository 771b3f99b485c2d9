//! # Consent Store
//!
//! Wires the pieces together: configuration resolution, the consent
//! manager with its storage backend, jurisdiction detection, the banner
//! policy, and the gating engine — all behind one mutex, with
//! synchronous commit-then-notify subscriptions.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use c15t_config::{ConfigError, ConsentOptions, TranslationBundle};
use c15t_consent::{
    banner_visibility, BannerVisibility, ClientContext, ConsentEventRecord, ConsentManager,
    ConsentState, JurisdictionDetector, LocationDetector, SaveMode,
};
use c15t_core::{ConsentCategory, JurisdictionDecision, ScriptId, SubjectId};
use c15t_gating::{GatingEngine, GatingError, GatingReport, NoopHost, ScriptDescriptor, ScriptHost};
use c15t_storage::{MemoryStorage, StorageBackend};

use crate::overlay::OverlayLock;

/// Errors raised while building or operating the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Options failed to resolve.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A script declaration was rejected.
    #[error("gating error: {0}")]
    Gating(#[from] GatingError),
}

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&ConsentState) + Send + Sync>;

struct Inner {
    manager: ConsentManager,
    engine: GatingEngine,
    detector: Box<dyn JurisdictionDetector>,
    context: ClientContext,
    jurisdiction: JurisdictionDecision,
    banner: BannerVisibility,
    listeners: BTreeMap<u64, Listener>,
    next_listener: u64,
}

/// Builder for [`ConsentStore`].
///
/// Every collaborator has a default: in-memory storage, location-based
/// detection honoring configured overrides, and a no-op script host.
#[derive(Default)]
pub struct ConsentStoreBuilder {
    options: ConsentOptions,
    storage: Option<Box<dyn StorageBackend>>,
    detector: Option<Box<dyn JurisdictionDetector>>,
    host: Option<Box<dyn ScriptHost>>,
    scripts: Vec<ScriptDescriptor>,
    context: ClientContext,
}

impl ConsentStoreBuilder {
    /// Start a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply integrator options (possibly pre-merged from layers).
    pub fn options(mut self, options: ConsentOptions) -> Self {
        self.options = options;
        self
    }

    /// Supply the storage backend. Defaults to [`MemoryStorage`].
    pub fn storage(mut self, storage: Box<dyn StorageBackend>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Supply the jurisdiction detector. Defaults to [`LocationDetector`].
    pub fn detector(mut self, detector: Box<dyn JurisdictionDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Supply the script host. Defaults to [`NoopHost`].
    pub fn host(mut self, host: Box<dyn ScriptHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// What is known about the client (resolved location, language).
    pub fn context(mut self, context: ClientContext) -> Self {
        self.context = context;
        self
    }

    /// Declare a gated script.
    pub fn script(mut self, script: ScriptDescriptor) -> Self {
        self.scripts.push(script);
        self
    }

    /// Resolve configuration, hydrate state, detect jurisdiction, apply
    /// the banner policy, and run the initial gating pass.
    pub fn build(self) -> Result<ConsentStore, StoreError> {
        let config = self.options.resolve()?;

        let storage = self
            .storage
            .unwrap_or_else(|| Box::new(MemoryStorage::new()));
        let detector = self
            .detector
            .unwrap_or_else(|| Box::new(LocationDetector::new(config.overrides.clone())));
        let host = self.host.unwrap_or_else(|| Box::new(NoopHost));

        let mut manager = ConsentManager::new(config, storage);
        let jurisdiction = detector.detect(&self.context);

        let banner = banner_visibility(manager.state(), manager.config(), &jurisdiction);
        // Degraded storage means state cannot be trusted; the prompt
        // stays suppressed no matter what the policy concluded.
        if !manager.is_degraded() {
            manager.set_show_popup(banner.show);
        }

        let mut engine = GatingEngine::new(host);
        for script in self.scripts {
            engine.register(script)?;
        }
        let report = engine.apply(manager.state());
        debug!(
            loaded = report.loaded.len(),
            jurisdiction = %jurisdiction.code,
            show_banner = banner.show,
            "consent store initialized"
        );

        Ok(ConsentStore {
            inner: Arc::new(Mutex::new(Inner {
                manager,
                engine,
                detector,
                context: self.context,
                jurisdiction,
                banner,
                listeners: BTreeMap::new(),
                next_listener: 0,
            })),
            overlay: OverlayLock::new(),
        })
    }
}

/// The subscribable consent surface.
///
/// Cloning shares the underlying store. All mutations serialize through
/// one mutex; listeners run synchronously after commit with the lock
/// released.
#[derive(Clone)]
pub struct ConsentStore {
    inner: Arc<Mutex<Inner>>,
    overlay: OverlayLock,
}

impl ConsentStore {
    /// Start building a store.
    pub fn builder() -> ConsentStoreBuilder {
        ConsentStoreBuilder::new()
    }

    /// An owned snapshot of the current consent state.
    pub fn state(&self) -> ConsentState {
        self.inner.lock().manager.snapshot()
    }

    /// The banner policy outcome computed at the last evaluation.
    pub fn banner(&self) -> BannerVisibility {
        self.inner.lock().banner
    }

    /// The detected jurisdiction.
    pub fn jurisdiction(&self) -> JurisdictionDecision {
        self.inner.lock().jurisdiction.clone()
    }

    /// The anonymous subject whose consent this store records.
    pub fn subject_id(&self) -> SubjectId {
        self.inner.lock().manager.subject_id().clone()
    }

    /// Whether the initial storage read failed and state is untrusted.
    pub fn is_degraded(&self) -> bool {
        self.inner.lock().manager.is_degraded()
    }

    /// The audit trail so far, oldest first.
    pub fn audit_log(&self) -> Vec<ConsentEventRecord> {
        self.inner.lock().manager.audit_log().to_vec()
    }

    /// Whether a script is currently loaded.
    pub fn is_script_loaded(&self, id: &ScriptId) -> bool {
        self.inner.lock().engine.is_loaded(id)
    }

    /// The banner text bundle for the client's language (override wins).
    pub fn translation_bundle(&self) -> TranslationBundle {
        let inner = self.inner.lock();
        let config = inner.manager.config();
        let language = config
            .overrides
            .language
            .as_deref()
            .or(inner.context.language.as_deref());
        config.translations.resolve(language).clone()
    }

    /// The overlay (scroll-lock) counter owned by this store.
    pub fn overlay(&self) -> &OverlayLock {
        &self.overlay
    }

    /// Subscribe to committed state changes.
    ///
    /// The listener runs synchronously after every commit, in
    /// subscription order.
    pub fn subscribe(
        &self,
        listener: impl Fn(&ConsentState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut inner = self.inner.lock();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.insert(id, Arc::new(listener));
        SubscriptionId(id)
    }

    /// Remove a subscription; returns whether it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.lock().listeners.remove(&id.0).is_some()
    }

    /// Set a single category grant. Revoking `necessary` is a no-op.
    pub fn set_consent(&self, category: ConsentCategory, granted: bool) -> ConsentState {
        self.mutate(|inner| {
            inner.manager.set_consent(category, granted);
        })
    }

    /// Apply a bulk save and close the prompt.
    pub fn save_consents(&self, mode: SaveMode) -> ConsentState {
        self.mutate(|inner| {
            inner.manager.save_consents(mode);
            inner.banner = banner_visibility(
                inner.manager.state(),
                inner.manager.config(),
                &inner.jurisdiction,
            );
        })
    }

    /// Revert to the pre-decision defaults, clear persisted state, and
    /// re-evaluate the banner policy against the fresh state.
    pub fn reset_consents(&self) -> ConsentState {
        self.mutate(|inner| {
            inner.manager.reset_consents();
            inner.jurisdiction = inner.detector.detect(&inner.context);
            inner.banner = banner_visibility(
                inner.manager.state(),
                inner.manager.config(),
                &inner.jurisdiction,
            );
            if !inner.manager.is_degraded() {
                let show = inner.banner.show;
                inner.manager.set_show_popup(show);
            }
        })
    }

    /// Directly override prompt visibility (re-open preferences).
    pub fn set_show_popup(&self, visible: bool) -> ConsentState {
        self.mutate(|inner| {
            inner.manager.set_show_popup(visible);
        })
    }

    /// Declare a gated script after construction; it participates in the
    /// diff immediately.
    pub fn register_script(&self, script: ScriptDescriptor) -> Result<(), StoreError> {
        let (snapshot, listeners) = {
            let mut inner = self.inner.lock();
            inner.engine.register(script)?;
            let snapshot = inner.manager.snapshot();
            let report = inner.engine.apply(&snapshot);
            if report.is_empty() {
                return Ok(());
            }
            (snapshot, inner.listeners.values().cloned().collect::<Vec<_>>())
        };
        for listener in &listeners {
            listener(&snapshot);
        }
        Ok(())
    }

    /// The gating engine's report for an explicit re-evaluation.
    ///
    /// Normally unnecessary — every mutation re-applies gating — but
    /// useful for integrations that change host state out of band.
    pub fn reapply_gating(&self) -> GatingReport {
        let mut inner = self.inner.lock();
        let snapshot = inner.manager.snapshot();
        inner.engine.apply(&snapshot)
    }

    /// Run a mutation, re-apply gating, then notify listeners with the
    /// lock released. A no-op (state unchanged, nothing gated) notifies
    /// nobody.
    fn mutate(&self, f: impl FnOnce(&mut Inner)) -> ConsentState {
        let (snapshot, listeners) = {
            let mut inner = self.inner.lock();
            let before = inner.manager.snapshot();
            f(&mut inner);
            let snapshot = inner.manager.snapshot();
            let report = inner.engine.apply(&snapshot);
            if snapshot == before && report.is_empty() {
                return snapshot;
            }
            if !report.is_empty() {
                debug!(
                    loaded = report.loaded.len(),
                    unloaded = report.unloaded.len(),
                    notified = report.notified.len(),
                    failures = report.failures.len(),
                    "gating re-evaluated"
                );
            }
            (snapshot, inner.listeners.values().cloned().collect::<Vec<_>>())
        };
        for listener in &listeners {
            listener(&snapshot);
        }
        snapshot
    }
}
