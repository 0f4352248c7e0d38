// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control plane (I, `spec.md` §4.9): polls the signal bus every second
//! and turns `pause-sync` / `resume-sync` / `stop` / `refresh-dashboard`
//! into flag mutations, or a shared cancellation firing on `stop`.

use std::time::Duration;

use dsync_core::{Clock, FlagName, SignalName, SystemClock};
use dsync_storage::Store;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct ControlPlane<C: Clock = SystemClock> {
    store: std::sync::Arc<Store<C>>,
}

impl<C: Clock> ControlPlane<C> {
    pub fn new(store: std::sync::Arc<Store<C>>) -> Self {
        Self { store }
    }

    /// Run until `stop` is observed or `cancel` fires from elsewhere.
    /// `stop` itself fires `cancel` so every other task — the executor,
    /// the debouncer, F's reader — winds down on the same signal.
    pub async fn run(&self, cancel: &CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(POLL_INTERVAL) => {}
            }

            if let Err(e) = self.poll_once(cancel) {
                tracing::warn!(error = %e, "control plane poll failed");
            }

            if cancel.is_cancelled() {
                return;
            }
        }
    }

    fn poll_once(&self, cancel: &CancellationToken) -> Result<(), dsync_storage::StoreError> {
        if self.store.consume_signal(SignalName::PauseSync)? {
            self.store.set_flag(FlagName::Paused, None)?;
            info!("sync paused");
        }
        if self.store.consume_signal(SignalName::ResumeSync)? {
            self.store.clear_flag(FlagName::Paused, None)?;
            info!("sync resumed");
        }
        if self.store.consume_signal(SignalName::RefreshDashboard)? {
            info!("refresh-dashboard signal received; no-op without a dashboard collaborator");
        }
        if self.store.consume_signal(SignalName::Stop)? {
            info!("stop signal received; beginning graceful shutdown");
            cancel.cancel();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "control_plane_tests.rs"]
mod tests;
