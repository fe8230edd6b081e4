// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end behaviour of the visualizer against a scripted backend.
//!
//! All tests run on a paused clock, so poll intervals elapse instantly and in
//! order whenever every task is idle.

use std::sync::Arc;
use std::time::Duration;

use roomviz_core::{PhotoUpload, ProductId};
use roomviz_engine::state::STILL_GENERATING_ADVISORY;
use roomviz_engine::{DisplayImage, EngineSettings, GenerationState, Visualizer};
use roomviz_test_utils::{MockBackend, ScriptedLookup, photo_handle, product, product_gs_url};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

fn settings() -> EngineSettings {
    EngineSettings {
        store_id: Some("store-7".into()),
        poll_interval: Duration::from_secs(1),
        max_attempts: 120,
        advisory_clear: Duration::from_secs(2),
    }
}

fn upload(name: &str) -> PhotoUpload {
    PhotoUpload {
        file_name: format!("{name}.jpg"),
        mime_type: "image/jpeg".into(),
        bytes: vec![0xFF, 0xD8, 0xFF],
        product_category: "Flooring".into(),
    }
}

fn start(backend: &Arc<MockBackend>, settings: EngineSettings) -> Visualizer {
    Visualizer::start(backend.clone(), settings, CancellationToken::new())
}

#[tokio::test(start_paused = true)]
async fn composite_replaces_photo_after_three_misses() {
    let backend = Arc::new(MockBackend::new());
    backend
        .ready_after(&product_gs_url("p1"), 3, "https://cdn.test/composites/d.jpg")
        .await;
    let viz = start(&backend, settings());

    let handle = viz.upload_photo(upload("room")).await.unwrap();
    assert_eq!(handle, photo_handle("room"));
    assert_eq!(viz.view().base, DisplayImage::Photo(handle.public_url.clone()));

    viz.select_product(product("p1"));
    assert!(viz.view().generating_overlay);

    let view = viz.settled().await;
    assert_eq!(
        view.base,
        DisplayImage::Composite("https://cdn.test/composites/d.jpg".into())
    );
    assert!(!view.generating_overlay);
    assert_eq!((view.pending, view.completed), (0, 1));

    let triggers = backend.triggers().await;
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].store_id, "store-7");
    assert_eq!(triggers[0].photo_gs_url, handle.gs_url);
    assert_eq!(triggers[0].product_ids, vec![ProductId::from("p1")]);
    assert_eq!(backend.lookup_count(&product_gs_url("p1")).await, 4);
    assert!(
        backend
            .lookups()
            .await
            .iter()
            .all(|(photo, _)| photo == &handle.gs_url)
    );

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn selection_before_upload_triggers_nothing() {
    let backend = Arc::new(MockBackend::new());
    let viz = start(&backend, settings());

    viz.select_product(product("p1"));
    sleep(Duration::from_secs(5)).await;

    assert!(backend.triggers().await.is_empty());
    assert!(backend.lookups().await.is_empty());
    assert_eq!(viz.view().base, DisplayImage::UploadPrompt);
    assert_eq!(viz.view().selected, Some(ProductId::from("p1")));

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn photo_arriving_after_selection_requests_selected_product() {
    let backend = Arc::new(MockBackend::new());
    backend.ready_after(&product_gs_url("p1"), 0, "https://cdn.test/c.jpg").await;
    let viz = start(&backend, settings());

    viz.select_product(product("p1"));
    viz.upload_photo(upload("room")).await.unwrap();

    let view = viz.settled().await;
    assert_eq!(view.base, DisplayImage::Composite("https://cdn.test/c.jpg".into()));
    assert_eq!(backend.triggers().await.len(), 1);

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn repeated_selection_issues_one_trigger() {
    let backend = Arc::new(MockBackend::new());
    backend.ready_after(&product_gs_url("p1"), 2, "https://cdn.test/c.jpg").await;
    let viz = start(&backend, settings());
    viz.upload_photo(upload("room")).await.unwrap();

    viz.select_product(product("p1"));
    viz.request_generation(product("p1"));
    viz.select_product(product("p1"));
    viz.settled().await;
    viz.select_product(product("p1"));
    sleep(Duration::from_secs(3)).await;

    assert_eq!(backend.triggers().await.len(), 1);
    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn products_resolve_independently() {
    let backend = Arc::new(MockBackend::new());
    backend.ready_after(&product_gs_url("p2"), 1, "https://cdn.test/c2.jpg").await;
    let viz = start(&backend, settings());
    viz.upload_photo(upload("room")).await.unwrap();

    viz.select_product(product("p1"));
    viz.select_product(product("p2"));
    assert_eq!(viz.view().pending, 2);

    let mut rx = viz.subscribe();
    rx.wait_for(|view| view.completed == 1).await.unwrap();

    let state = viz.snapshot();
    assert!(state.completed().contains(&ProductId::from("p2")));
    assert!(state.generating().contains(&ProductId::from("p1")));
    assert_eq!(
        viz.view().base,
        DisplayImage::Composite("https://cdn.test/c2.jpg".into())
    );

    viz.select_product(product("p1"));
    let view = viz.view();
    assert!(view.generating_overlay);
    assert_eq!(view.base, DisplayImage::Photo(photo_handle("room").public_url));
    assert_eq!(backend.triggers().await.len(), 2);

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn lookup_error_does_not_abort_cycle() {
    let backend = Arc::new(MockBackend::new());
    backend
        .script_lookups(
            &product_gs_url("p1"),
            vec![
                ScriptedLookup::Error("connection reset".into()),
                ScriptedLookup::Ready("https://cdn.test/c1.jpg".into()),
            ],
        )
        .await;
    backend.ready_after(&product_gs_url("p2"), 0, "https://cdn.test/c2.jpg").await;
    let viz = start(&backend, settings());
    viz.upload_photo(upload("room")).await.unwrap();

    viz.request_generation(product("p1"));
    viz.request_generation(product("p2"));

    sleep(Duration::from_millis(1500)).await;
    let state = viz.snapshot();
    assert!(state.completed().contains(&ProductId::from("p2")));
    assert_eq!(state.entry(&ProductId::from("p1")).unwrap().attempts, 1);

    let view = viz.settled().await;
    assert_eq!(view.completed, 2);
    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn slow_lookup_does_not_hold_back_ready_products() {
    let backend = Arc::new(MockBackend::new());
    backend
        .delay_lookups(&product_gs_url("p1"), Duration::from_secs(30))
        .await;
    backend.ready_after(&product_gs_url("p2"), 0, "https://cdn.test/c2.jpg").await;
    let viz = start(&backend, settings());
    viz.upload_photo(upload("room")).await.unwrap();

    viz.request_generation(product("p1"));
    viz.select_product(product("p2"));

    sleep(Duration::from_secs(3)).await;
    let state = viz.snapshot();
    assert!(state.completed().contains(&ProductId::from("p2")));
    assert!(state.generating().contains(&ProductId::from("p1")));
    assert_eq!(
        viz.view().base,
        DisplayImage::Composite("https://cdn.test/c2.jpg".into())
    );

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn overlapping_uploads_keep_the_latest_photo() {
    let backend = Arc::new(MockBackend::new());
    backend.delay_upload("a.jpg", Duration::from_secs(5)).await;
    backend.delay_upload("b.jpg", Duration::from_secs(1)).await;
    let viz = start(&backend, settings());
    viz.select_product(product("p1"));

    let (first, second) = tokio::join!(viz.upload_photo(upload("a")), async {
        sleep(Duration::from_millis(10)).await;
        viz.upload_photo(upload("b")).await
    });
    assert_eq!(first.unwrap(), photo_handle("a"));
    assert_eq!(second.unwrap(), photo_handle("b"));

    let state = viz.snapshot();
    assert_eq!(state.photo(), Some(&photo_handle("b")));
    assert_eq!(viz.view().base, DisplayImage::Photo(photo_handle("b").public_url));
    assert!(state.generating().contains(&ProductId::from("p1")));

    sleep(Duration::from_millis(10)).await;
    let triggers = backend.triggers().await;
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].photo_gs_url, photo_handle("b").gs_url);

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn dropping_visualizer_leaves_caller_token_alone() {
    let backend = Arc::new(MockBackend::new());
    let cancel = CancellationToken::new();

    let viz = Visualizer::start(backend.clone(), settings(), cancel.clone());
    drop(viz);
    assert!(!cancel.is_cancelled());

    let viz = Visualizer::start(backend, settings(), cancel.clone());
    viz.shutdown().await;
    assert!(!cancel.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn reupload_clears_displayed_composite() {
    let backend = Arc::new(MockBackend::new());
    backend.ready_after(&product_gs_url("p1"), 0, "https://cdn.test/old.jpg").await;
    let viz = start(&backend, settings());
    viz.upload_photo(upload("living")).await.unwrap();
    viz.select_product(product("p1"));
    let view = viz.settled().await;
    assert_eq!(view.base, DisplayImage::Composite("https://cdn.test/old.jpg".into()));

    let kitchen = viz.upload_photo(upload("kitchen")).await.unwrap();
    let view = viz.view();
    assert_eq!(view.base, DisplayImage::Photo(kitchen.public_url.clone()));
    assert!(view.generating_overlay);
    assert_eq!(view.completed, 0);

    sleep(Duration::from_millis(10)).await;
    let triggers = backend.triggers().await;
    assert_eq!(triggers.len(), 2);
    assert_eq!(triggers[1].photo_gs_url, kitchen.gs_url);

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failed_upload_resets_to_prompt() {
    let backend = Arc::new(MockBackend::new());
    backend.push_upload(Err("413 payload too large".into())).await;
    let viz = start(&backend, settings());

    let err = viz.upload_photo(upload("huge")).await.unwrap_err();
    assert!(err.to_string().contains("413"));
    assert_eq!(viz.view().base, DisplayImage::UploadPrompt);
    assert!(viz.snapshot().photo().is_none());

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn trigger_failure_marks_product_failed_and_reselect_retries() {
    let backend = Arc::new(MockBackend::new());
    backend.fail_triggers("503 unavailable").await;
    let viz = start(&backend, settings());
    viz.upload_photo(upload("room")).await.unwrap();

    viz.select_product(product("p1"));
    let view = viz.settled().await;
    assert_eq!(view.failed, 1);
    assert!(view.advisory.is_some());
    assert!(matches!(
        viz.entry(&ProductId::from("p1")).unwrap().state,
        GenerationState::Failed { .. }
    ));

    viz.select_product(product("p1"));
    assert_eq!(viz.view().pending, 1);
    sleep(Duration::from_millis(10)).await;
    assert_eq!(backend.triggers().await.len(), 2);

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn late_trigger_failure_does_not_undo_completion() {
    let backend = Arc::new(MockBackend::new());
    backend.delay_triggers(Duration::from_secs(5)).await;
    backend.fail_triggers("gateway timeout").await;
    backend.ready_after(&product_gs_url("p1"), 0, "https://cdn.test/c.jpg").await;
    let viz = start(&backend, settings());
    viz.upload_photo(upload("room")).await.unwrap();

    viz.select_product(product("p1"));
    viz.settled().await;
    sleep(Duration::from_secs(10)).await;

    let view = viz.view();
    assert_eq!(view.base, DisplayImage::Composite("https://cdn.test/c.jpg".into()));
    assert_eq!((view.completed, view.failed), (1, 0));

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn polling_gives_up_after_max_attempts() {
    let backend = Arc::new(MockBackend::new());
    let viz = start(
        &backend,
        EngineSettings {
            max_attempts: 3,
            ..settings()
        },
    );
    viz.upload_photo(upload("room")).await.unwrap();
    viz.select_product(product("p1"));

    let view = viz.settled().await;
    assert_eq!((view.pending, view.failed), (0, 1));
    assert_eq!(backend.lookup_count(&product_gs_url("p1")).await, 3);

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn poller_stops_when_nothing_pending() {
    let backend = Arc::new(MockBackend::new());
    backend.ready_after(&product_gs_url("p1"), 1, "https://cdn.test/c.jpg").await;
    let viz = start(&backend, settings());
    viz.upload_photo(upload("room")).await.unwrap();
    viz.select_product(product("p1"));
    viz.settled().await;

    let before = backend.lookups().await.len();
    sleep(Duration::from_secs(30)).await;
    assert_eq!(backend.lookups().await.len(), before);

    // A new request wakes the parked poller.
    backend.ready_after(&product_gs_url("p2"), 0, "https://cdn.test/c2.jpg").await;
    viz.select_product(product("p2"));
    let view = viz.settled().await;
    assert_eq!(view.completed, 2);

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn not_ready_advisory_clears_after_delay() {
    let backend = Arc::new(MockBackend::new());
    let viz = start(
        &backend,
        EngineSettings {
            poll_interval: Duration::from_secs(10),
            ..settings()
        },
    );
    viz.upload_photo(upload("room")).await.unwrap();
    viz.select_product(product("p1"));

    sleep(Duration::from_secs(11)).await;
    assert_eq!(viz.view().advisory.as_deref(), Some(STILL_GENERATING_ADVISORY));

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(viz.view().advisory, None);
    assert!(viz.view().generating_overlay);

    viz.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_polling() {
    let backend = Arc::new(MockBackend::new());
    let cancel = CancellationToken::new();
    let viz = Visualizer::start(backend.clone(), settings(), cancel.clone());
    viz.upload_photo(upload("room")).await.unwrap();
    viz.select_product(product("p1"));
    sleep(Duration::from_millis(2500)).await;

    cancel.cancel();
    let view = viz.settled().await;
    assert_eq!(view.pending, 1);
    assert!(viz.is_cancelled());

    let before = backend.lookups().await.len();
    sleep(Duration::from_secs(10)).await;
    assert_eq!(backend.lookups().await.len(), before);
}
