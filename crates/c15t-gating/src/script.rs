//! # Script Descriptors
//!
//! The static declaration an integrator writes for each gated script:
//! which consent it needs, how it behaves at the edges of the lifecycle,
//! and which callbacks to invoke as it loads and unloads.

use std::sync::Arc;

use c15t_core::{CategoryExpr, ScriptId};
use serde::{Deserialize, Serialize};

/// Where in the lifecycle an event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPhase {
    /// About to be injected (or activated, for callback-only scripts).
    BeforeLoad,
    /// Injection succeeded.
    Loaded,
    /// Torn down, or notified of revocation for persistent scripts.
    Deleted,
}

/// Payload handed to lifecycle callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEvent {
    /// The script this event concerns.
    pub script_id: ScriptId,
    /// The DOM element id of the injected tag (equal to the script id).
    pub element_id: String,
    /// The lifecycle edge that fired.
    pub phase: ScriptPhase,
}

/// A lifecycle callback supplied by the integrator.
///
/// Failures are caught per-script by the engine; returning an error never
/// blocks other scripts.
pub type ScriptCallback = Arc<dyn Fn(&ScriptEvent) -> anyhow::Result<()> + Send + Sync>;

/// The callbacks a script may register.
#[derive(Clone, Default)]
pub struct ScriptCallbacks {
    /// Fired before injection.
    pub on_before_load: Option<ScriptCallback>,
    /// Fired after successful injection.
    pub on_load: Option<ScriptCallback>,
    /// Fired on teardown or revocation notice.
    pub on_delete: Option<ScriptCallback>,
}

impl std::fmt::Debug for ScriptCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptCallbacks")
            .field("on_before_load", &self.on_before_load.is_some())
            .field("on_load", &self.on_load.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .finish()
    }
}

/// A gated script declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDescriptor {
    /// Unique identifier; doubles as the injected element id.
    pub id: ScriptId,
    /// The consent expression that must hold for the script to load.
    pub category: CategoryExpr,
    /// Source URL of the tag; absent for callback-only scripts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Bypass consent gating entirely (the script always loads).
    #[serde(default)]
    pub always_load: bool,
    /// Skip tag injection; only the callbacks run.
    #[serde(default)]
    pub callback_only: bool,
    /// On revocation, keep the tag and only notify `on_delete` — the
    /// script self-manages opt-out through its own API.
    #[serde(default)]
    pub persist_after_revoked: bool,
    /// Lifecycle callbacks.
    #[serde(skip)]
    pub callbacks: ScriptCallbacks,
}

impl ScriptDescriptor {
    /// Declare a script gated by the given expression.
    pub fn new(id: ScriptId, category: impl Into<CategoryExpr>) -> Self {
        Self {
            id,
            category: category.into(),
            src: None,
            always_load: false,
            callback_only: false,
            persist_after_revoked: false,
            callbacks: ScriptCallbacks::default(),
        }
    }

    /// Set the tag source URL.
    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Bypass consent gating for this script.
    pub fn always_load(mut self) -> Self {
        self.always_load = true;
        self
    }

    /// Skip tag injection; run callbacks only.
    pub fn callback_only(mut self) -> Self {
        self.callback_only = true;
        self
    }

    /// Keep the tag on revocation and rely on `on_delete` notification.
    pub fn persist_after_revoked(mut self) -> Self {
        self.persist_after_revoked = true;
        self
    }

    /// Register the before-load callback.
    pub fn on_before_load(
        mut self,
        f: impl Fn(&ScriptEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_before_load = Some(Arc::new(f));
        self
    }

    /// Register the after-load callback.
    pub fn on_load(
        mut self,
        f: impl Fn(&ScriptEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_load = Some(Arc::new(f));
        self
    }

    /// Register the teardown/revocation callback.
    pub fn on_delete(
        mut self,
        f: impl Fn(&ScriptEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_delete = Some(Arc::new(f));
        self
    }

    /// The event payload for a given lifecycle phase.
    pub(crate) fn event(&self, phase: ScriptPhase) -> ScriptEvent {
        ScriptEvent {
            script_id: self.id.clone(),
            element_id: self.id.as_str().to_string(),
            phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use c15t_core::ConsentCategory;

    fn id(s: &str) -> ScriptId {
        ScriptId::new(s).unwrap()
    }

    #[test]
    fn test_builder_sets_flags() {
        let script = ScriptDescriptor::new(id("ga4"), ConsentCategory::Measurement)
            .src("https://example.com/ga4.js")
            .persist_after_revoked();
        assert!(script.persist_after_revoked);
        assert!(!script.always_load);
        assert_eq!(script.src.as_deref(), Some("https://example.com/ga4.js"));
    }

    #[test]
    fn test_event_uses_id_as_element_id() {
        let script = ScriptDescriptor::new(id("pixel"), ConsentCategory::Marketing);
        let event = script.event(ScriptPhase::Loaded);
        assert_eq!(event.element_id, "pixel");
        assert_eq!(event.phase, ScriptPhase::Loaded);
    }

    #[test]
    fn test_descriptor_deserializes_from_declaration() {
        let script: ScriptDescriptor = serde_json::from_str(
            r#"{
                "id": "pixel",
                "category": {"and": ["marketing", "measurement"]},
                "src": "https://example.com/pixel.js",
                "persist_after_revoked": true
            }"#,
        )
        .unwrap();
        assert_eq!(script.id.as_str(), "pixel");
        assert!(script.persist_after_revoked);
        assert!(!script.callback_only);
    }
}
