//! End-to-end consent lifecycle through the public store surface.

use std::sync::Arc;

use parking_lot::Mutex;

use c15t_config::ConsentOptions;
use c15t_consent::{BannerReason, FixedJurisdiction, SaveMode};
use c15t_core::{CategoryExpr, ConsentCategory, JurisdictionCode, ScriptId};
use c15t_gating::{HostError, ScriptDescriptor, ScriptHost};
use c15t_storage::{FileStorage, UnavailableStorage};
use c15t_store::ConsentStore;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

fn script_id(s: &str) -> ScriptId {
    ScriptId::new(s).unwrap()
}

/// A host whose interaction log outlives the store that owns it.
#[derive(Clone, Default)]
struct SharedHost {
    log: Arc<Mutex<Vec<String>>>,
}

impl ScriptHost for SharedHost {
    fn inject(&mut self, script: &ScriptDescriptor) -> Result<(), HostError> {
        self.log.lock().push(format!("inject:{}", script.id));
        Ok(())
    }

    fn remove(&mut self, id: &ScriptId) -> Result<(), HostError> {
        self.log.lock().push(format!("remove:{id}"));
        Ok(())
    }
}

#[test]
fn full_lifecycle_under_gdpr() {
    init_logging();

    let host = SharedHost::default();
    let log = host.log.clone();
    let deletions = Arc::new(Mutex::new(Vec::new()));
    let deletions_sink = deletions.clone();

    let store = ConsentStore::builder()
        .detector(Box::new(FixedJurisdiction(JurisdictionCode::Gdpr)))
        .host(Box::new(host))
        .script(
            ScriptDescriptor::new(
                script_id("pixel"),
                CategoryExpr::and([
                    ConsentCategory::Marketing.into(),
                    ConsentCategory::Measurement.into(),
                ]),
            )
            .src("https://example.com/pixel.js")
            .on_delete(move |event| {
                deletions_sink.lock().push(event.element_id.clone());
                Ok(())
            }),
        )
        .script(ScriptDescriptor::new(script_id("banner-cdn"), ConsentCategory::Necessary).always_load())
        .build()
        .unwrap();

    // Fresh GDPR visitor: prompt pending, only the always-load script is in.
    assert!(store.banner().show);
    assert_eq!(store.banner().reason, BannerReason::JurisdictionRequires);
    assert!(!store.state().decision_made);
    assert!(store.is_script_loaded(&script_id("banner-cdn")));
    assert!(!store.is_script_loaded(&script_id("pixel")));

    // Accept everything: the gated script loads.
    let state = store.save_consents(SaveMode::All);
    assert!(state.decision_made);
    assert!(!state.show_popup);
    assert!(store.is_script_loaded(&script_id("pixel")));
    assert!(log.lock().contains(&"inject:pixel".to_string()));

    // Revoking one conjunct tears the script down and fires on_delete.
    store.set_consent(ConsentCategory::Measurement, false);
    assert!(!store.is_script_loaded(&script_id("pixel")));
    assert_eq!(*deletions.lock(), vec!["pixel".to_string()]);
    assert!(log.lock().contains(&"remove:pixel".to_string()));

    // Reset: defaults back, prompt required again, storage cleared.
    let state = store.reset_consents();
    assert!(!state.decision_made);
    assert!(store.banner().show);
    assert!(store.state().show_popup);

    // The always-load script never left.
    assert!(store.is_script_loaded(&script_id("banner-cdn")));
}

#[test]
fn idempotent_gating_through_the_store() {
    init_logging();

    let host = SharedHost::default();
    let log = host.log.clone();

    let store = ConsentStore::builder()
        .detector(Box::new(FixedJurisdiction(JurisdictionCode::Gdpr)))
        .host(Box::new(host))
        .script(ScriptDescriptor::new(
            script_id("analytics"),
            ConsentCategory::Measurement,
        ))
        .build()
        .unwrap();

    store.set_consent(ConsentCategory::Measurement, true);
    let interactions_after_load = log.lock().len();

    // Re-evaluating with no state change must do nothing.
    let report = store.reapply_gating();
    assert!(report.is_empty());
    assert_eq!(log.lock().len(), interactions_after_load);
}

#[test]
fn degraded_storage_suppresses_prompt_without_panicking() {
    init_logging();

    let store = ConsentStore::builder()
        .detector(Box::new(FixedJurisdiction(JurisdictionCode::Gdpr)))
        .storage(Box::new(UnavailableStorage::new()))
        .build()
        .unwrap();

    assert!(store.is_degraded());
    // Under GDPR the policy would prompt, but untrusted state suppresses it.
    assert!(!store.state().show_popup);
    assert!(!store.state().loading);

    // Mutations still work; the in-memory state stands.
    let state = store.save_consents(SaveMode::All);
    assert!(state.granted(ConsentCategory::Marketing));
}

#[test]
fn decision_survives_restart_via_file_storage() {
    init_logging();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("consent.json");

    let first = ConsentStore::builder()
        .detector(Box::new(FixedJurisdiction(JurisdictionCode::Gdpr)))
        .storage(Box::new(FileStorage::new(&path)))
        .build()
        .unwrap();
    assert!(first.banner().show);
    first.save_consents(SaveMode::NecessaryOnly);
    let subject = first.subject_id();

    // A second store over the same file sees the decision: no prompt,
    // same subject, only the essential grant.
    let second = ConsentStore::builder()
        .detector(Box::new(FixedJurisdiction(JurisdictionCode::Gdpr)))
        .storage(Box::new(FileStorage::new(&path)))
        .build()
        .unwrap();
    assert!(!second.banner().show);
    assert_eq!(second.banner().reason, BannerReason::DecisionAlreadyMade);
    assert_eq!(second.subject_id(), subject);
    for category in ConsentCategory::all_categories() {
        assert_eq!(second.state().granted(*category), category.is_essential());
    }
}

#[test]
fn options_from_yaml_drive_the_store() {
    init_logging();

    let options = ConsentOptions::from_yaml_str(
        r#"
mode: offline
categories: [necessary, measurement]
overrides:
  country: DE
"#,
    )
    .unwrap();

    let store = ConsentStore::builder().options(options).build().unwrap();
    // Country override forces the prompt even before detection.
    assert_eq!(store.banner().reason, BannerReason::CountryOverride);
    // Unoffered categories are not granted by a bulk accept.
    let state = store.save_consents(SaveMode::All);
    assert!(state.granted(ConsentCategory::Measurement));
    assert!(!state.granted(ConsentCategory::Marketing));
}
