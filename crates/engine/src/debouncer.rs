// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event debouncer (the second half of G, `spec.md` §4.7): collapses rapid
//! bursts per path and flushes a quiet buffer into the job store on a
//! cancellable timer.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::normalizer::NormalizedChange;

/// Default quiet period after the last batch before a flush (`spec.md` §4.7).
pub const DEBOUNCE_MS: u64 = 500;

/// A change-source directory's clock, not yet durable. `spec.md` §5
/// requires clock writes to happen *after* the enqueue of every event the
/// clock covers, so the debouncer holds these alongside the changes they
/// came with and only hands them to the store once the matching batch has
/// been flushed into `sync_jobs` — a crash before that point re-delivers
/// the same change-source events on the next startup instead of silently
/// advancing past them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClock {
    pub directory: String,
    pub clock: String,
}

/// Per-path mutable buffer: later changes for the same path overwrite
/// earlier ones within a burst. Keyed by `local_path`, which is unique per
/// watch root + relative path — equivalent to keying by `relative_path`
/// since a debouncer only ever buffers changes for a single watch root set.
///
/// Clock updates are buffered the same way, per directory: a later update
/// for a directory overwrites an earlier one, since only the most recent
/// clock needs to survive to the next flush.
pub struct Debouncer {
    buffer: Mutex<HashMap<String, NormalizedChange>>,
    clocks: Mutex<HashMap<String, String>>,
    activity: Notify,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debouncer {
    pub fn new() -> Self {
        Self { buffer: Mutex::new(HashMap::new()), clocks: Mutex::new(HashMap::new()), activity: Notify::new() }
    }

    /// Merge a freshly-normalized batch and its pending clock updates into
    /// the buffer and restart the debounce timer.
    pub fn ingest(
        &self,
        changes: impl IntoIterator<Item = NormalizedChange>,
        clock_updates: impl IntoIterator<Item = PendingClock>,
    ) {
        let mut buf = self.buffer.lock();
        for change in changes {
            buf.insert(change.local_path.clone(), change);
        }
        drop(buf);

        let mut clocks = self.clocks.lock();
        for pending in clock_updates {
            clocks.insert(pending.directory, pending.clock);
        }
        drop(clocks);

        self.activity.notify_one();
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Take everything buffered right now: the normalized changes and the
    /// clock updates they carry. Used by one-shot mode's synchronous flush
    /// once all watch roots have been queried, bypassing the timer
    /// entirely.
    pub fn take(&self) -> (Vec<NormalizedChange>, Vec<PendingClock>) {
        let changes = self.buffer.lock().drain().map(|(_, v)| v).collect();
        let clocks = self
            .clocks
            .lock()
            .drain()
            .map(|(directory, clock)| PendingClock { directory, clock })
            .collect();
        (changes, clocks)
    }

    /// Run the debounce timer until `cancel` fires.
    ///
    /// Waits for the first sign of activity, then restarts a `debounce`
    /// window on every further [`Self::ingest`] until one full window
    /// passes quietly, at which point `flush` is called with everything
    /// buffered. On cancellation, whatever remains buffered is flushed once
    /// more before returning (`spec.md` §4.9's "drain the debouncer to the
    /// store" shutdown step).
    pub async fn run(
        &self,
        debounce: Duration,
        cancel: &CancellationToken,
        mut flush: impl FnMut(Vec<NormalizedChange>, Vec<PendingClock>),
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    if !self.is_empty() {
                        let (changes, clocks) = self.take();
                        flush(changes, clocks);
                    }
                    return;
                }
                _ = self.activity.notified() => {}
            }
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        if !self.is_empty() {
                            let (changes, clocks) = self.take();
                            flush(changes, clocks);
                        }
                        return;
                    }
                    result = tokio::time::timeout(debounce, self.activity.notified()) => {
                        if result.is_ok() {
                            continue;
                        }
                        break;
                    }
                }
            }
            if !self.is_empty() {
                let (changes, clocks) = self.take();
                flush(changes, clocks);
            }
        }
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod tests;
