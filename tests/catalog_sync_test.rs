//! Catalog invalidation between the admin panel and public pages.

mod common;

use std::sync::Arc;
use std::time::Duration;

use clinicsync_core::error::AppError;
use clinicsync_core::traits::kv_store::KeyValueStore;
use clinicsync_entity::clinic::ClinicDraft;
use clinicsync_entity::notification::NotificationKind;
use clinicsync_realtime::sync::agent::UPDATED_NOTICE;
use clinicsync_realtime::{Notice, SyncState};
use clinicsync_storage::local::LocalKeyValueStore;

use common::{TestSession, settle};

#[tokio::test(start_paused = true)]
async fn test_admin_edit_reaches_every_public_page() {
    let session = TestSession::new();
    let admin = session.admin_page().await;
    let pages = vec![session.public_page().await, session.public_page().await];
    settle().await;
    for page in &pages {
        assert_eq!(page.surface.last_catalog().unwrap().cards.len(), 1);
    }

    let report = admin
        .session
        .editor
        .create(&ClinicDraft::new("Radiance Skin", "Leeds"))
        .await
        .unwrap();
    assert_eq!(report.delivered, 2);
    settle().await;

    for page in &pages {
        let view = page.surface.last_catalog().unwrap();
        let names: Vec<_> = view.cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Elite Dermatology", "Radiance Skin"]);
        assert_eq!(page.surface.notices(), vec![Notice::info(UPDATED_NOTICE)]);
        assert_eq!(page.session.agent.as_ref().unwrap().state(), SyncState::Ready);
    }

    // The admin page never hears its own publish.
    assert!(admin.surface.notices().is_empty());
    let log = admin.session.notifications.list().await.value;
    assert_eq!(log[0].kind, NotificationKind::Success);

    admin.session.shutdown().await.unwrap();
    for page in &pages {
        page.session.shutdown().await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_keeps_last_render() {
    let session = TestSession::new();
    let page = session.public_page().await;
    settle().await;
    let before = page.surface.last_catalog().unwrap();

    session
        .catalog
        .fail_with(Some(AppError::backend("x")));
    let agent = page.session.agent.clone().unwrap();
    agent.request(clinicsync_realtime::sync::RefreshTrigger::Manual);
    settle().await;

    assert_eq!(
        agent.state(),
        SyncState::Failed {
            reason: "x".to_string()
        }
    );
    assert_eq!(page.surface.last_catalog().unwrap(), before);

    // No automatic retry; the timer heals it.
    let calls = session.catalog.list_calls();
    session.catalog.fail_with(None);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(session.catalog.list_calls(), calls);
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(agent.state(), SyncState::Ready);

    page.session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_rapid_publishes_coalesce_for_late_pages() {
    let session = TestSession::new();
    let admin = session.admin_page().await;
    for n in 0..3 {
        admin
            .session
            .editor
            .create(&ClinicDraft::new(format!("Clinic {n}"), "York"))
            .await
            .unwrap();
    }

    // A page opened afterwards can only see the last event.
    let late = session.public_page().await;
    let latest = late
        .session
        .context
        .latest("catalog_update")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.data.as_array().unwrap().len(), 5);
    settle().await;
    assert_eq!(late.surface.last_catalog().unwrap().total, 5);

    admin.session.shutdown().await.unwrap();
    late.session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_edit_from_another_process_arrives_by_polling() {
    let dir = tempfile::tempdir().unwrap();
    let admin_store = LocalKeyValueStore::new(dir.path()).await.unwrap();
    let public_store = LocalKeyValueStore::new(dir.path()).await.unwrap();

    let admin_process = TestSession::with_store(Arc::new(admin_store));
    let mut public_process = TestSession::with_store(Arc::new(public_store));
    public_process.catalog = admin_process.catalog.clone();

    let page = public_process.public_page().await;
    let keys = vec!["admin_clinic_update".to_string()];
    // Seed, then let the admin write.
    public_process.bus.poll_external(&keys).await;
    settle().await;
    let before = session_calls(&public_process);

    let admin = admin_process.admin_page().await;
    admin
        .session
        .editor
        .create(&ClinicDraft::new("Far Away", "Bath"))
        .await
        .unwrap();

    assert_eq!(public_process.bus.poll_external(&keys).await, 1);
    settle().await;
    assert!(session_calls(&public_process) > before);
    assert_eq!(page.surface.last_catalog().unwrap().cards.len(), 2);
    assert_eq!(page.surface.notices(), vec![Notice::info(UPDATED_NOTICE)]);

    let raw = admin_process
        .bus
        .attach()
        .get("admin_clinic_update")
        .await
        .unwrap();
    assert!(raw.is_some());

    admin.session.shutdown().await.unwrap();
    page.session.shutdown().await.unwrap();
}

fn session_calls(session: &TestSession) -> u64 {
    session.catalog.list_calls()
}

#[tokio::test]
async fn test_local_store_round_trip_through_trait() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(LocalKeyValueStore::new(dir.path()).await.unwrap());
    store.set("admin_clinic_update", "{}").await.unwrap();
    assert_eq!(store.get("admin_clinic_update").await.unwrap().as_deref(), Some("{}"));
}
