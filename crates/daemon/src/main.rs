// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dsyncd`: the drive-sync daemon binary. Wires F (change-source), G
//! (normalizer + debouncer), H (executor), and I (control plane) together
//! as tasks on one `tokio` runtime, spawned side by side and joined back
//! through a single shared cancellation token at shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dsync_adapters::{SocketChangeSourceClient, UnconfiguredDriveClient};
use dsync_daemon::{change_source::ChangeSource, config::Config, control_plane::ControlPlane, lifecycle, paths};
use dsync_engine::{Debouncer, Executor};
use dsync_storage::Store;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(15);

fn foreground() -> bool {
    std::env::args().any(|a| a == "--foreground")
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if foreground() {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        None
    } else {
        let log_path = paths::log_path();
        let dir = log_path.parent().map(|p| p.to_path_buf()).unwrap_or_default();
        let file_name = log_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
        Some(guard)
    }
}

/// Connect to the change-source service, retrying with a fixed delay —
/// it's an external daemon this process doesn't spawn or own (`spec.md`
/// §1), so a connection failure at startup is expected to be transient.
async fn connect_change_source(cancel: &CancellationToken) -> anyhow::Result<SocketChangeSourceClient> {
    let socket_path = paths::change_source_socket_path();
    loop {
        match SocketChangeSourceClient::connect(&socket_path).await {
            Ok(client) => return Ok(client),
            Err(e) => {
                tracing::warn!(error = %e, socket = %socket_path.display(), "change-source connect failed, retrying");
                tokio::select! {
                    _ = cancel.cancelled() => anyhow::bail!("shutdown requested before change-source connected"),
                    _ = tokio::time::sleep(CONNECT_RETRY_DELAY) => {}
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging();

    paths::ensure_dirs().context("creating state/config directories")?;
    let config = Config::load(paths::config_path()).context("loading config")?;
    let watch_roots = config.watch_roots().context("resolving configured sync_dirs")?;

    let store = Arc::new(Store::open(paths::state_db_path()).context("opening state database")?);
    lifecycle::ensure_not_already_running(&store).context("checking RUNNING flag")?;
    lifecycle::mark_running(&store).context("recording RUNNING flag")?;

    let cancel = CancellationToken::new();

    let change_source_client = connect_change_source(&cancel).await.context("connecting to change-source service")?;
    let mut change_source = ChangeSource::new(change_source_client, config.remote_root.clone());
    let (initial_batch, initial_clocks) =
        change_source.register_all(&store, &watch_roots).await.context("registering watch roots")?;
    let change_source = Arc::new(Mutex::new(change_source));

    let debouncer = Arc::new(Debouncer::new());
    debouncer.ingest(initial_batch, initial_clocks);

    let executor = Arc::new(Executor::new(store.clone(), UnconfiguredDriveClient));
    let control_plane = Arc::new(ControlPlane::new(store.clone()));

    let executor_task = {
        let executor = executor.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { executor.run(&cancel).await })
    };

    let control_plane_task = {
        let control_plane = control_plane.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { control_plane.run(&cancel).await })
    };

    let debouncer_task = {
        let debouncer = debouncer.clone();
        let store = store.clone();
        let executor = executor.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            debouncer
                .run(Duration::from_millis(dsync_engine::DEBOUNCE_MS), &cancel, |changes, clocks| {
                    if let Err(e) = lifecycle::enqueue_changes_and_advance_clocks(&store, &changes, &clocks) {
                        tracing::warn!(error = %e, "failed to enqueue normalized changes");
                    } else {
                        executor.wake();
                    }
                })
                .await
        })
    };

    let reader_task = {
        let debouncer = debouncer.clone();
        let change_source = change_source.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            loop {
                let next = {
                    let mut guard = change_source.lock().await;
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        result = guard.next_batch() => result,
                    }
                };
                match next {
                    Ok((batch, clock)) => debouncer.ingest(batch, vec![clock]),
                    Err(e) => {
                        tracing::warn!(error = %e, "change-source read failed");
                        if cancel.is_cancelled() {
                            return;
                        }
                    }
                }
            }
        })
    };

    cancel.cancelled().await;

    if tokio::time::timeout(SHUTDOWN_GRACE, executor_task).await.is_err() {
        tracing::warn!("executor did not finish its in-flight job within the shutdown grace period");
    }
    // Both tasks are cancel-aware and return promptly once `cancel` has
    // fired; the debouncer's own cancellation branch performs the "drain
    // to the store" step before returning, so it must be awaited here
    // rather than aborted, or that flush never runs.
    let _ = debouncer_task.await;
    let _ = reader_task.await;
    let _ = control_plane_task.await;

    lifecycle::graceful_shutdown(&store, &debouncer, &change_source).await.context("graceful shutdown")?;

    Ok(())
}
