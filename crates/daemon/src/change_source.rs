// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-level wiring for the change-source adapter (F, `spec.md` §4.6):
//! registers every configured watch root, writes the settle-time config
//! file, tracks whether the change-source service was spawned by us or
//! was already running, and turns its query/subscription results into
//! batches the debouncer can ingest.

use std::collections::HashMap;

use dsync_adapters::ChangeSourceClient;
use dsync_core::{Clock, FlagName, FlagVariant, SyncError, WatchRoot, WatchmanLifecycle};
use dsync_engine::{normalize_batch, NormalizedChange, PendingClock, DEBOUNCE_MS};
use dsync_storage::Store;
use tracing::{debug, info, warn};

const SETTLE_CONFIG_FILE: &str = ".watchmanconfig";

/// Write the settle-time config file into `watch_root` if one isn't
/// already present (`spec.md` §4.6: "default 500 ms").
fn ensure_settle_file(watch_root: &WatchRoot) -> std::io::Result<()> {
    let path = watch_root.local_path().join(SETTLE_CONFIG_FILE);
    if path.exists() {
        return Ok(());
    }
    let body = serde_json::json!({ "settle": DEBOUNCE_MS }).to_string();
    std::fs::write(path, body)
}

/// Daemon-level handle to the change-source connection: owns the one
/// stateful client and the `subscription_name -> watch_root` mapping
/// the service's reported watch root may not match exactly.
pub struct ChangeSource<Cs: ChangeSourceClient> {
    client: Cs,
    remote_root: String,
    subscriptions: HashMap<String, WatchRoot>,
}

impl<Cs: ChangeSourceClient> ChangeSource<Cs> {
    pub fn new(client: Cs, remote_root: String) -> Self {
        Self { client, remote_root, subscriptions: HashMap::new() }
    }

    /// Register every configured watch root: `watch-project`, settle file,
    /// resume from the saved clock (A), subscribe, and return the initial
    /// catch-up batch for each root, paired with the clock each root's
    /// batch is covered by. The clocks are returned rather than written
    /// here — `spec.md` §5 requires a directory's clock to advance only
    /// after the changes it covers are durably enqueued, and registration
    /// happens before anything has been enqueued. Records SPAWNED/EXISTING
    /// on first registration only, derived from the first root's
    /// `is_fresh_instance` (`spec.md` §4.6): a freshly-started service has
    /// no prior state.
    pub async fn register_all<C: Clock>(
        &mut self,
        store: &Store<C>,
        watch_roots: &[WatchRoot],
    ) -> Result<(Vec<NormalizedChange>, Vec<PendingClock>), SyncError> {
        let mut batch = Vec::new();
        let mut clocks = Vec::new();
        for watch_root in watch_roots {
            let (changes, clock) = self.register_one(store, watch_root).await?;
            batch.extend(changes);
            clocks.push(clock);
        }
        Ok((batch, clocks))
    }

    async fn register_one<C: Clock>(
        &mut self,
        store: &Store<C>,
        watch_root: &WatchRoot,
    ) -> Result<(Vec<NormalizedChange>, PendingClock), SyncError> {
        let local_path = watch_root.local_path().to_string_lossy().into_owned();

        ensure_settle_file(watch_root)
            .map_err(|e| SyncError::local_io(format!("writing {SETTLE_CONFIG_FILE} in {local_path}: {e}")))?;

        let watch = self.client.watch_project(&local_path).await?;
        let since = store.get_clock(&local_path).map_err(|e| SyncError::service_unavailable(e.to_string()))?;

        let result = self.client.query(&watch, since).await?;
        self.record_lifecycle(store, result.is_fresh_instance)?;

        let subscription_name = format!("dsync:{local_path}");
        self.client.subscribe(&watch, &subscription_name, Some(result.clock.clone())).await?;
        self.subscriptions.insert(subscription_name, watch_root.clone());

        info!(local_path, "registered watch root");
        let pending_clock = PendingClock { directory: local_path, clock: result.clock };
        Ok((normalize_batch(watch_root, &self.remote_root, &result.files), pending_clock))
    }

    /// Record SPAWNED/EXISTING the first time it's observed; subsequent
    /// roots on the same connection can't disagree, so later calls are a
    /// no-op once the flag is set.
    fn record_lifecycle<C: Clock>(&self, store: &Store<C>, is_fresh_instance: bool) -> Result<(), SyncError> {
        if store.has_flag(FlagName::WatchmanRunning).map_err(|e| SyncError::service_unavailable(e.to_string()))? {
            return Ok(());
        }
        let lifecycle = if is_fresh_instance { WatchmanLifecycle::Spawned } else { WatchmanLifecycle::Existing };
        store
            .set_flag(FlagName::WatchmanRunning, Some(&FlagVariant::Lifecycle(lifecycle)))
            .map_err(|e| SyncError::service_unavailable(e.to_string()))?;
        Ok(())
    }

    /// Block for the next subscription push and normalize it into a batch
    /// paired with its pending clock. Events for a subscription name this
    /// connection no longer tracks are logged and discarded (`spec.md`
    /// §4.6) rather than erroring the caller out. The clock is returned
    /// rather than written here, for the same reason as in
    /// [`Self::register_one`]: it must not advance until the caller has
    /// durably enqueued the batch it came with.
    pub async fn next_batch(&mut self) -> Result<(Vec<NormalizedChange>, PendingClock), SyncError> {
        loop {
            let event = self.client.next_event().await?;
            let Some(watch_root) = self.subscriptions.get(&event.subscription) else {
                warn!(subscription = %event.subscription, "discarding event for unknown subscription");
                continue;
            };
            let local_path = watch_root.local_path().to_string_lossy().into_owned();
            debug!(subscription = %event.subscription, files = event.files.len(), "subscription event");
            let pending_clock = PendingClock { directory: local_path, clock: event.clock.clone() };
            return Ok((normalize_batch(watch_root, &self.remote_root, &event.files), pending_clock));
        }
    }

    /// Graceful teardown (`spec.md` §4.6, §4.9): a SPAWNED instance is
    /// asked to terminate, an EXISTING one is left running for whoever
    /// else depends on it.
    pub async fn shutdown<C: Clock>(&mut self, store: &Store<C>) -> Result<(), SyncError> {
        for name in self.subscriptions.keys().cloned().collect::<Vec<_>>() {
            if let Some(watch_root) = self.subscriptions.get(&name).cloned() {
                let local_path = watch_root.local_path().to_string_lossy().into_owned();
                self.client.unsubscribe(&local_path, &name).await?;
            }
        }
        self.subscriptions.clear();

        let lifecycle = store
            .get_flag_data(FlagName::WatchmanRunning)
            .map_err(|e| SyncError::service_unavailable(e.to_string()))?
            .and_then(|v| match v {
                FlagVariant::Lifecycle(l) => Some(l),
                _ => None,
            });
        if lifecycle == Some(WatchmanLifecycle::Spawned) {
            self.client.shutdown_server().await?;
        }
        store.clear_flag(FlagName::WatchmanRunning, None).map_err(|e| SyncError::service_unavailable(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "change_source_tests.rs"]
mod tests;
