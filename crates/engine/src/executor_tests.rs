// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dsync_adapters::{ChildIter, DriveClient, FakeDriveClient};
use dsync_core::{EventType, FakeClock, FlagName, JobStatus};
use dsync_storage::JobInput;
use tokio_util::sync::CancellationToken;

use super::*;

/// A drive client whose every call fails with a fixed error kind, for
/// exercising the executor's failure-handling branches without threading
/// failure injection through [`FakeDriveClient`].
#[derive(Clone)]
struct FailingDriveClient {
    kind: ErrorKind,
}

impl FailingDriveClient {
    fn err(&self) -> SyncError {
        SyncError::new(self.kind, "injected failure")
    }
}

#[async_trait]
impl DriveClient for FailingDriveClient {
    fn root_id(&self) -> &str {
        "root"
    }

    async fn list_children(&self, _folder_id: &str) -> Result<ChildIter, SyncError> {
        Err(self.err())
    }

    async fn create_folder(&self, _parent_id: &str, _name: &str) -> Result<String, SyncError> {
        Err(self.err())
    }

    async fn upload_file(
        &self,
        _parent_id: &str,
        _name: &str,
        _existing_file_id: Option<&str>,
        _local_path: &Path,
    ) -> Result<String, SyncError> {
        Err(self.err())
    }

    async fn trash(&self, _node_id: &str) -> Result<(), SyncError> {
        Err(self.err())
    }

    async fn delete(&self, _node_id: &str) -> Result<(), SyncError> {
        Err(self.err())
    }

    async fn move_node(&self, _node_id: &str, _new_parent_id: &str) -> Result<(), SyncError> {
        Err(self.err())
    }

    async fn rename(&self, _node_id: &str, _new_name: &str) -> Result<(), SyncError> {
        Err(self.err())
    }
}

#[tokio::test]
async fn update_job_syncs_on_success() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();

    store
        .enqueue_job(JobInput {
            event_type: EventType::Update,
            local_path: file.path().to_str().unwrap(),
            remote_path: "a/b.txt",
            old_remote_path: None,
        })
        .unwrap();

    let executor = Executor::new(store.clone(), FakeDriveClient::new());
    let job = store.get_next_pending_job().unwrap().unwrap();
    executor.process(job).await;

    assert_eq!(store.get_counts().unwrap().synced, 1);
}

#[tokio::test]
async fn delete_job_on_missing_target_is_synced() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store
        .enqueue_job(JobInput {
            event_type: EventType::Delete,
            local_path: "/tmp/gone.txt",
            remote_path: "nowhere/gone.txt",
            old_remote_path: None,
        })
        .unwrap();

    let executor = Executor::new(store.clone(), FakeDriveClient::new());
    let job = store.get_next_pending_job().unwrap().unwrap();
    executor.process(job).await;

    assert_eq!(store.get_counts().unwrap().synced, 1);
}

#[tokio::test]
async fn transient_failure_schedules_a_backoff_retry() {
    let clock = FakeClock::new();
    let store = Arc::new(Store::open_in_memory_with_clock(clock.clone()).unwrap());
    store
        .enqueue_job(JobInput {
            event_type: EventType::Update,
            local_path: "/tmp/whatever.txt",
            remote_path: "a/whatever.txt",
            old_remote_path: None,
        })
        .unwrap();

    let drive = FailingDriveClient { kind: ErrorKind::NetworkTransient };
    let executor = Executor::new(store.clone(), drive);
    let job = store.get_next_pending_job().unwrap().unwrap();
    executor.process(job).await;

    let counts = store.get_counts().unwrap();
    assert_eq!(counts.pending, 1);
    assert_eq!(counts.synced, 0);
    assert_eq!(counts.blocked, 0);

    clock.advance(Duration::from_secs(600));
    let retried = store.get_next_pending_job().unwrap().unwrap();
    assert_eq!(retried.n_retries, 1);
    assert!(retried.last_error.is_some());
}

#[tokio::test]
async fn name_conflict_blocks_immediately() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store
        .enqueue_job(JobInput {
            event_type: EventType::Update,
            local_path: "/tmp/dup.txt",
            remote_path: "a/dup.txt",
            old_remote_path: None,
        })
        .unwrap();

    let drive = FailingDriveClient { kind: ErrorKind::NameConflict };
    let executor = Executor::new(store.clone(), drive);
    let job = store.get_next_pending_job().unwrap().unwrap();
    executor.process(job).await;

    let blocked = store.list_blocked().unwrap();
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].status, JobStatus::Blocked);
}

#[tokio::test]
async fn auth_expired_retries_once_then_blocks() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store
        .enqueue_job(JobInput {
            event_type: EventType::Update,
            local_path: "/tmp/auth.txt",
            remote_path: "a/auth.txt",
            old_remote_path: None,
        })
        .unwrap();

    let drive = FailingDriveClient { kind: ErrorKind::AuthExpired };
    let executor = Executor::new(store.clone(), drive);

    let job = store.get_next_pending_job().unwrap().unwrap();
    executor.process(job).await;
    assert_eq!(store.get_counts().unwrap().pending, 1, "first failure retries");

    let job = store.get_next_pending_job().unwrap().unwrap();
    assert_eq!(job.n_retries, 1);
    executor.process(job).await;
    assert_eq!(store.get_counts().unwrap().blocked, 1, "second failure blocks");
}

#[tokio::test]
async fn degraded_child_blocks_the_job_with_decryption_failure() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();

    let drive = FakeDriveClient::new();
    let root = drive.root_id().to_string();
    let parent_id = drive.create_folder(&root, "a").await.unwrap();
    drive.inject_degraded_child(&parent_id, "undecryptable name");

    store
        .enqueue_job(JobInput {
            event_type: EventType::Update,
            local_path: file.path().to_str().unwrap(),
            remote_path: "a/dup.txt",
            old_remote_path: None,
        })
        .unwrap();

    let executor = Executor::new(store.clone(), drive);
    let job = store.get_next_pending_job().unwrap().unwrap();
    executor.process(job).await;

    let blocked = store.list_blocked().unwrap();
    assert_eq!(blocked.len(), 1);
    assert!(blocked[0].last_error.as_deref().unwrap().contains("undecryptable name"));
}

#[tokio::test(start_paused = true)]
async fn run_stops_promptly_on_cancellation() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let executor = Arc::new(Executor::new(store, FakeDriveClient::new()));
    let cancel = CancellationToken::new();

    let run_executor = executor.clone();
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        run_executor.run(&run_cancel).await;
    });

    tokio::task::yield_now().await;
    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn run_skips_dispatch_while_paused() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.set_flag(FlagName::Paused, None).unwrap();
    store
        .enqueue_job(JobInput {
            event_type: EventType::Update,
            local_path: "/tmp/paused.txt",
            remote_path: "a/paused.txt",
            old_remote_path: None,
        })
        .unwrap();

    let executor = Arc::new(Executor::new(store.clone(), FakeDriveClient::new()));
    let cancel = CancellationToken::new();
    let run_executor = executor.clone();
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        run_executor.run(&run_cancel).await;
    });

    tokio::time::advance(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;
    assert_eq!(store.get_counts().unwrap().pending, 1, "paused loop must not dispatch");

    cancel.cancel();
    handle.await.unwrap();
}
