// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use dsync_storage::Store;

use super::*;

#[tokio::test(start_paused = true)]
async fn pause_sync_sets_the_paused_flag() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.send_signal(SignalName::PauseSync).unwrap();

    let control_plane = ControlPlane::new(store.clone());
    let cancel = CancellationToken::new();
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { control_plane.run(&run_cancel).await });

    tokio::time::advance(POLL_INTERVAL + Duration::from_millis(10)).await;
    tokio::task::yield_now().await;
    assert!(store.has_flag(FlagName::Paused).unwrap());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn resume_sync_clears_the_paused_flag() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.set_flag(FlagName::Paused, None).unwrap();
    store.send_signal(SignalName::ResumeSync).unwrap();

    let control_plane = ControlPlane::new(store.clone());
    let cancel = CancellationToken::new();
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { control_plane.run(&run_cancel).await });

    tokio::time::advance(POLL_INTERVAL + Duration::from_millis(10)).await;
    tokio::task::yield_now().await;
    assert!(!store.has_flag(FlagName::Paused).unwrap());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stop_fires_cancellation_and_the_loop_exits() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.send_signal(SignalName::Stop).unwrap();

    let control_plane = ControlPlane::new(store.clone());
    let cancel = CancellationToken::new();
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { control_plane.run(&run_cancel).await });

    tokio::time::advance(POLL_INTERVAL + Duration::from_millis(10)).await;
    handle.await.unwrap();

    assert!(cancel.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn run_exits_promptly_on_external_cancellation_with_no_signals_pending() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let control_plane = ControlPlane::new(store);
    let cancel = CancellationToken::new();

    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { control_plane.run(&run_cancel).await });

    tokio::task::yield_now().await;
    cancel.cancel();
    handle.await.unwrap();
}
