// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor loop (H, `spec.md` §4.8): a single cooperative loop that claims
//! the next due job, dispatches it by `event_type` through D and E, and
//! records the outcome — synced, retried with backoff, or blocked.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use dsync_adapters::DriveClient;
use dsync_core::{Clock, ErrorKind, EventType, FlagName, SyncError, SyncJob, SystemClock};
use dsync_storage::Store;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::remote_ops::{create_folder_path, delete_path, move_path, upload_file};

/// How long the loop sleeps while PAUSED, or while idle with nothing due —
/// bounded by the 1s ceiling from `spec.md` §4.8 point 2. A [`Notify`] wake
/// lets the debouncer cut this short as soon as it flushes new jobs.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A single cooperative job-processing loop over one job store and drive
/// client.
pub struct Executor<Dr: DriveClient, C: Clock = SystemClock> {
    store: Arc<Store<C>>,
    drive: Dr,
    wake: Notify,
}

impl<Dr: DriveClient, C: Clock> Executor<Dr, C> {
    pub fn new(store: Arc<Store<C>>, drive: Dr) -> Self {
        Self { store, drive, wake: Notify::new() }
    }

    /// Cut the current idle/paused sleep short. Called by the debouncer
    /// right after flushing a batch into the store.
    pub fn wake(&self) {
        self.wake.notify_one();
    }

    /// Run until `cancel` fires. Every suspension point (store read,
    /// drive-client call, sleep) is cancel-aware so shutdown can interrupt
    /// between jobs without leaving a job half-processed.
    pub async fn run(&self, cancel: &CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                return;
            }

            match self.store.has_flag(FlagName::Paused) {
                Ok(true) => {
                    self.idle_wait(cancel).await;
                    continue;
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(error = %err, "failed to read PAUSED flag");
                    self.idle_wait(cancel).await;
                    continue;
                }
            }

            let job = match self.store.get_next_pending_job() {
                Ok(Some(job)) => job,
                Ok(None) => {
                    self.idle_wait(cancel).await;
                    continue;
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to claim next pending job");
                    self.idle_wait(cancel).await;
                    continue;
                }
            };

            self.process(job).await;
        }
    }

    async fn idle_wait(&self, cancel: &CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
            _ = self.wake.notified() => {}
        }
    }

    async fn process(&self, job: SyncJob) {
        match self.dispatch(&job).await {
            Ok(()) => {
                if let Err(err) = self.store.mark_synced(job.id) {
                    tracing::error!(job_id = job.id, error = %err, "failed to mark job synced");
                }
            }
            Err(err) => self.handle_failure(&job, err),
        }
    }

    async fn dispatch(&self, job: &SyncJob) -> Result<(), SyncError> {
        match job.event_type {
            EventType::Delete => delete_path(&self.drive, &job.remote_path, false).await,
            EventType::Create => {
                create_folder_path(&self.drive, &job.remote_path).await.map(|_| ())
            }
            EventType::Update => {
                upload_file(&self.drive, Path::new(&job.local_path), &job.remote_path)
                    .await
                    .map(|_| ())
            }
            EventType::Move => {
                let old_remote_path = job.old_remote_path.as_deref().ok_or_else(|| {
                    SyncError::new(ErrorKind::LocalIo, "MOVE job missing old_remote_path")
                })?;
                move_path(&self.drive, old_remote_path, &job.remote_path).await
            }
        }
    }

    /// Record a failed job's outcome: success-for-delete on a vanished
    /// node, an immediate block for the non-retriable kinds, one retry for
    /// `AuthExpired`, and ordinary backoff for everything else (the store's
    /// own `MAX_RETRIES` ceiling converts that to BLOCKED eventually).
    fn handle_failure(&self, job: &SyncJob, err: SyncError) {
        if job.event_type == EventType::Delete && err.kind.is_success_for_delete() {
            if let Err(e) = self.store.mark_synced(job.id) {
                tracing::error!(job_id = job.id, error = %e, "failed to mark vanished-node delete synced");
            }
            return;
        }

        let outcome = match err.kind {
            ErrorKind::NameConflict | ErrorKind::QuotaExceeded | ErrorKind::DecryptionFailure | ErrorKind::NotFound => {
                self.store.mark_blocked(job.id, &err.message)
            }
            ErrorKind::AuthExpired if job.n_retries >= 1 => self.store.mark_blocked(job.id, &err.message),
            _ => self.store.schedule_retry(job.id, &err.message).map(|_| ()),
        };

        if let Err(e) = outcome {
            tracing::error!(job_id = job.id, error = %e, "failed to record job failure");
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
