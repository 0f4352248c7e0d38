// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The embedded store (`spec.md` §6): a single SQLite file holding the
//! `clocks`, `signals`, `sync_jobs`, and `flags` tables, guarded by one
//! in-process mutex so the daemon's several tasks (F's socket reader, the
//! debounce timer, the executor loop, the control-plane poller) serialize
//! on a single `rusqlite::Connection`, the same way a daemon's several
//! request handlers serialize on one shared runtime mutex.

use std::path::Path;
use std::sync::Arc;

use dsync_core::{Clock, SystemClock};
use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::schema::MIGRATIONS;

/// Handle to the embedded store, cheap to clone and share across tasks.
#[derive(Clone)]
pub struct Store<C: Clock = SystemClock> {
    pub(crate) conn: Arc<Mutex<Connection>>,
    pub(crate) clock: C,
}

impl Store<SystemClock> {
    /// Open (creating if absent) the store at `path`, running migrations and
    /// crash recovery.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_clock(path, SystemClock)
    }

    /// An in-memory store for tests that don't need to exercise file I/O.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open_in_memory_with_clock(SystemClock)
    }
}

impl<C: Clock> Store<C> {
    pub fn open_with_clock(path: impl AsRef<Path>, clock: C) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        Self::from_connection(conn, clock)
    }

    pub fn open_in_memory_with_clock(clock: C) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, clock)
    }

    fn from_connection(conn: Connection, clock: C) -> Result<Self, StoreError> {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        conn.pragma_update(None, "busy_timeout", 5_000i64)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        for stmt in MIGRATIONS {
            conn.execute_batch(stmt)
                .map_err(|e| StoreError::Migration(e.to_string()))?;
        }
        let store = Self { conn: Arc::new(Mutex::new(conn)), clock };
        store.recover_crashed_jobs()?;
        Ok(store)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Crash recovery (`spec.md` §4.3): any row left in PROCESSING when the
    /// daemon starts was claimed by an executor that never resolved it,
    /// most likely because the process was killed mid-job. Reset it to
    /// PENDING with `retry_at = now` so the next executor pass picks it up
    /// immediately rather than leaving it stuck forever.
    fn recover_crashed_jobs(&self) -> Result<(), StoreError> {
        let now = self.clock.epoch_ms() as i64;
        let conn = self.conn.lock();
        let n = conn.execute(
            "UPDATE sync_jobs SET status = 'PENDING', retry_at = ?1 WHERE status = 'PROCESSING'",
            [now],
        )?;
        if n > 0 {
            warn!(recovered = n, "reset PROCESSING jobs to PENDING on startup");
        } else {
            info!("no stale PROCESSING jobs found on startup");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
