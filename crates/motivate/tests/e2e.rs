// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the acquisition pipeline over a real shared store.
//!
//! Each test owns a temp-directory SQLite file. Remote behavior is either a
//! scripted picker or a wiremock backend speaking the PostgREST wire format.

use std::sync::Arc;
use std::time::Duration;

use motivate_acquire::{
    CategoryPreferenceStore, ImageAcquisitionCoordinator, NetworkMonitor, ReloadBroadcaster,
    SelectionWatcher, TimelineScheduler,
};
use motivate_core::{
    AcquisitionError, CacheError, Connectivity, EntryState, ImageCache, Provenance,
    RemoteErrorKind, SelectionPersistence, WIDGET_KIND,
};
use motivate_remote::{BackendClient, RemoteImagePicker};
use motivate_storage::{SqliteImageCache, SqliteSelectionStore};
use motivate_test_utils::{MockPicker, PickerBehavior, TempStore, sample_bytes, sample_record};
use secrecy::SecretString;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coordinator_over(
    picker: Arc<MockPicker>,
    cache: SqliteImageCache,
) -> ImageAcquisitionCoordinator {
    ImageAcquisitionCoordinator::new(picker, Arc::new(cache), NetworkMonitor::new())
}

// ---- Remote success ----

#[tokio::test]
async fn remote_image_is_returned_and_written_through_to_cache() {
    let store = TempStore::new().await.unwrap();
    let picker = Arc::new(MockPicker::succeeding(sample_record(7), sample_bytes(7)));
    let coordinator = coordinator_over(picker.clone(), store.image_cache(8));

    let image = coordinator.acquire(None).await.unwrap();
    assert_eq!(image.provenance, Provenance::Remote);
    assert_eq!(image.image_id, Some(7));
    assert_eq!(image.bytes, sample_bytes(7));
    assert_eq!(coordinator.monitor().current(), Connectivity::Online);

    // A second handle on the same file sees the cached copy.
    let other = SqliteImageCache::new(store.reopen().await.unwrap(), &Default::default());
    let cached = other.get_random().await.unwrap().unwrap();
    assert_eq!(cached.image_id, Some(7));
    assert_eq!(cached.bytes, sample_bytes(7));
}

// ---- Offline fallback ----

#[tokio::test]
async fn remote_failure_falls_back_to_cached_image() {
    let store = TempStore::new().await.unwrap();
    let cache = store.image_cache(8);
    cache.seed(sample_bytes(3)).await.unwrap();

    let picker = Arc::new(MockPicker::failing(RemoteErrorKind::Network));
    let coordinator = coordinator_over(picker, cache);

    let image = coordinator.acquire(Some(&[1, 2])).await.unwrap();
    assert_eq!(image.provenance, Provenance::Cache);
    assert_eq!(image.bytes, sample_bytes(3));
    assert_eq!(coordinator.monitor().current(), Connectivity::Offline);
}

#[tokio::test]
async fn empty_remote_result_falls_back_without_marking_offline() {
    let store = TempStore::new().await.unwrap();
    let cache = store.image_cache(8);
    cache.seed(sample_bytes(4)).await.unwrap();

    let coordinator = coordinator_over(
        Arc::new(MockPicker::failing(RemoteErrorKind::Empty)),
        cache,
    );

    let image = coordinator.acquire(Some(&[99])).await.unwrap();
    assert_eq!(image.provenance, Provenance::Cache);
    assert_eq!(coordinator.monitor().current(), Connectivity::Online);
}

#[tokio::test]
async fn remote_failure_with_empty_cache_reports_both_sides() {
    let store = TempStore::new().await.unwrap();
    let coordinator = coordinator_over(
        Arc::new(MockPicker::failing(RemoteErrorKind::Network)),
        store.image_cache(8),
    );

    let err = coordinator.acquire(None).await.unwrap_err();
    assert!(matches!(
        err,
        AcquisitionError::NoFallbackAvailable {
            cache: CacheError::Empty,
            ..
        }
    ));
    assert!(err.is_cache_empty());
    assert!(
        err.to_string().contains("no offline images available"),
        "{err}"
    );
}

// ---- Cache capacity ----

#[tokio::test]
async fn repeated_acquisitions_keep_cache_within_capacity() {
    let store = TempStore::new().await.unwrap();
    let picker = Arc::new(MockPicker::succeeding(sample_record(1), sample_bytes(1)));
    let coordinator = coordinator_over(picker.clone(), store.image_cache(2));

    for id in 1..=5u8 {
        picker.set_behavior(PickerBehavior::Succeed {
            record: sample_record(i64::from(id)),
            bytes: sample_bytes(id),
        });
        coordinator.acquire(None).await.unwrap();
    }

    let cache = store.image_cache(2);
    assert_eq!(cache.len().await.unwrap(), 2);
}

// ---- Full wire pipeline ----

#[tokio::test]
async fn wiremock_backend_drives_remote_then_offline_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_random_image"))
        .and(body_json(serde_json::json!({"category_ids": [2]})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": 11, "image_url": "dawn run.jpg"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/object/public/motivational-images//dawn%20run.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0x11]))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(
        &server.uri(),
        &SecretString::from("anon".to_string()),
        "motivational-images",
        Duration::from_secs(5),
    )
    .unwrap();

    let store = TempStore::new().await.unwrap();
    let coordinator = ImageAcquisitionCoordinator::new(
        Arc::new(RemoteImagePicker::new(client)),
        Arc::new(store.image_cache(8)),
        NetworkMonitor::new(),
    );

    let first = coordinator.acquire(Some(&[2])).await.unwrap();
    assert_eq!(first.provenance, Provenance::Remote);
    assert_eq!(first.image_id, Some(11));

    // Backend now fails every call; the image cached above is served instead.
    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let second = coordinator.acquire(Some(&[2])).await.unwrap();
    assert_eq!(second.provenance, Provenance::Cache);
    assert_eq!(second.image_id, Some(11));
    assert_eq!(second.bytes, first.bytes);
}

// ---- Preferences reach the background surface ----

#[tokio::test]
async fn toggled_categories_filter_the_next_timeline() {
    let store = TempStore::new().await.unwrap();

    let broadcaster = Arc::new(ReloadBroadcaster::new());
    let mut reloads = broadcaster.subscribe();
    let preferences = CategoryPreferenceStore::new(
        Arc::new(store.selection_store()),
        broadcaster.clone(),
        Duration::from_millis(20),
    );
    preferences.toggle(5);
    preferences.toggle(2);
    preferences.shutdown().await;
    assert_eq!(reloads.recv().await.unwrap(), WIDGET_KIND);

    // The background surface reads through its own handle.
    let widget_selections = SqliteSelectionStore::new(store.reopen().await.unwrap());
    let persisted: Vec<i64> = widget_selections.load().await.unwrap().ids().collect();
    assert_eq!(persisted, vec![2, 5]);

    let picker = Arc::new(MockPicker::succeeding(sample_record(9), sample_bytes(9)));
    let scheduler = TimelineScheduler::new(
        coordinator_over(picker.clone(), store.image_cache(8)),
        Arc::new(widget_selections),
        Duration::from_secs(60),
        Duration::from_secs(5),
    );

    let timeline = scheduler.timeline().await;
    assert_eq!(timeline.entries.len(), 1);
    assert_eq!(timeline.entries[0].image_id(), Some(9));
    assert_eq!(picker.filters(), vec![Some(vec![2, 5])]);
}

#[tokio::test]
async fn toggle_in_another_process_reruns_the_widget_early() {
    let store = TempStore::new().await.unwrap();

    // Widget side: its own handle, an hour-long refresh, and a watcher
    // feeding the scheduler's reload channel.
    let widget_selections = Arc::new(SqliteSelectionStore::new(store.reopen().await.unwrap()));
    let picker = Arc::new(MockPicker::succeeding(sample_record(9), sample_bytes(9)));
    let scheduler = TimelineScheduler::new(
        coordinator_over(picker.clone(), store.image_cache(8)),
        widget_selections.clone(),
        Duration::from_secs(3600),
        Duration::from_secs(5),
    );
    let widget_reloads = Arc::new(ReloadBroadcaster::new());
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(
        SelectionWatcher::new(
            widget_selections,
            widget_reloads.clone(),
            Duration::from_millis(50),
        )
        .run(cancel.clone()),
    );
    let (tx, mut timelines) = mpsc::channel(4);
    let widget = tokio::spawn({
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        let reloads = widget_reloads.subscribe();
        async move { scheduler.run(cancel, reloads, tx).await }
    });

    let first = timelines.recv().await.unwrap();
    assert_eq!(first.entries[0].image_id(), Some(9));
    assert_eq!(picker.filters(), vec![None]);

    // App side: a separate handle and a broadcaster nothing in the widget
    // listens to.
    let preferences = CategoryPreferenceStore::new(
        Arc::new(store.selection_store()),
        Arc::new(ReloadBroadcaster::new()),
        Duration::from_millis(20),
    );
    preferences.toggle(3);
    preferences.shutdown().await;

    let second = tokio::time::timeout(Duration::from_secs(5), timelines.recv())
        .await
        .expect("widget did not re-run before its refresh interval")
        .unwrap();
    assert_eq!(second.entries[0].image_id(), Some(9));
    assert_eq!(picker.filters(), vec![None, Some(vec![3])]);

    cancel.cancel();
    widget.await.unwrap();
    watcher.await.unwrap();
}

#[tokio::test]
async fn interactive_request_reports_loading_then_failure_message() {
    let store = TempStore::new().await.unwrap();
    let scheduler = TimelineScheduler::new(
        coordinator_over(
            Arc::new(MockPicker::failing(RemoteErrorKind::Network)),
            store.image_cache(8),
        ),
        Arc::new(store.selection_store()),
        Duration::from_secs(60),
        Duration::from_secs(5),
    );

    let mut updates = scheduler.request();
    assert_eq!(updates.recv().await.unwrap().state, EntryState::Loading);
    match updates.recv().await.unwrap().state {
        EntryState::Failed(message) => {
            assert!(message.contains("no offline fallback"), "{message}");
        }
        other => panic!("expected a failure entry, got {other:?}"),
    }
    assert!(updates.recv().await.is_none());
}
