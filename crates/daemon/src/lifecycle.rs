// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup and shutdown sequencing (I, `spec.md` §4.9): refuse-to-start
//! liveness check on the RUNNING flag, and the graceful-shutdown teardown
//! that runs once the control plane's `stop` signal fires the shared
//! cancellation token.

use std::sync::Arc;

use dsync_adapters::ChangeSourceClient;
use dsync_core::{Clock, FlagName, FlagVariant};
use dsync_engine::{NormalizedChange, PendingClock};
use dsync_storage::{JobInput, Store, StoreError};
use nix::sys::signal::kill;
use nix::unistd::Pid;
use thiserror::Error;
use tracing::{info, warn};

use crate::change_source::ChangeSource;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("daemon already running with pid {0}")]
    AlreadyRunning(u32),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn pid_is_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Refuse to start if RUNNING names a PID that's still alive; a RUNNING
/// flag left over from a crashed process is stale and reclaimable
/// (`spec.md` §4.2, §4.9).
pub fn ensure_not_already_running<C: Clock>(store: &Store<C>) -> Result<(), LifecycleError> {
    if let Some(FlagVariant::Pid(pid)) = store.get_flag_data(FlagName::Running)? {
        if pid_is_alive(pid) {
            return Err(LifecycleError::AlreadyRunning(pid));
        }
        warn!(pid, "clearing stale RUNNING flag left by a dead process");
        store.clear_flag(FlagName::Running, None)?;
    }
    Ok(())
}

pub fn mark_running<C: Clock>(store: &Store<C>) -> Result<(), LifecycleError> {
    let pid = std::process::id();
    store.set_flag(FlagName::Running, Some(&FlagVariant::Pid(pid)))?;
    info!(pid, "daemon started");
    Ok(())
}

/// Enqueue a batch of normalized changes, the shared tail end of both the
/// debouncer's normal flush and the drain performed at shutdown.
pub fn enqueue_changes<C: Clock>(store: &Store<C>, changes: &[NormalizedChange]) -> Result<(), StoreError> {
    for change in changes {
        store.enqueue_job(JobInput {
            event_type: change.event_type,
            local_path: &change.local_path,
            remote_path: &change.remote_path,
            old_remote_path: change.old_remote_path.as_deref(),
        })?;
    }
    Ok(())
}

/// Enqueue a batch of normalized changes and only then advance the clocks
/// they were read at (`spec.md` §5). The ordering is the whole point: if
/// the daemon crashes between the two steps, restart re-reads from the
/// not-yet-advanced clock and re-delivers the same change-source events
/// rather than silently losing them.
pub fn enqueue_changes_and_advance_clocks<C: Clock>(
    store: &Store<C>,
    changes: &[NormalizedChange],
    clocks: &[PendingClock],
) -> Result<(), StoreError> {
    enqueue_changes(store, changes)?;
    for pending in clocks {
        store.set_clock(&pending.directory, &pending.clock, false)?;
    }
    Ok(())
}

/// Graceful-shutdown teardown (`spec.md` §4.9): drain whatever the
/// debouncer is still holding into the job store, tear down the
/// change-source subscriptions, and clear RUNNING. Waiting up to 15 s for
/// the in-flight executor job is the caller's responsibility — it holds
/// the executor's task handle, this function doesn't.
pub async fn graceful_shutdown<C: Clock, Cs: ChangeSourceClient>(
    store: &Store<C>,
    debouncer: &dsync_engine::Debouncer,
    change_source: &Arc<tokio::sync::Mutex<ChangeSource<Cs>>>,
) -> Result<(), LifecycleError> {
    let (remaining, clocks) = debouncer.take();
    if !remaining.is_empty() || !clocks.is_empty() {
        info!(n = remaining.len(), "draining debouncer into job store before shutdown");
        enqueue_changes_and_advance_clocks(store, &remaining, &clocks)?;
    }

    if let Err(e) = change_source.lock().await.shutdown(store).await {
        warn!(error = %e, "change-source teardown failed during shutdown");
    }

    store.clear_flag(FlagName::Running, None)?;
    info!("daemon stopped");
    Ok(())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
