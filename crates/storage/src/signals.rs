// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal bus (B, `spec.md` §4.2, §4.9): any process — the CLI, a restart
//! script — appends a signal row; the control plane polls for specific
//! signal names and consumes exactly one matching row per call, so the same
//! signal delivered twice is handled twice, not collapsed.

use dsync_core::{Clock, SignalName};
use rusqlite::OptionalExtension;

use crate::error::StoreError;
use crate::store::Store;

impl<C: Clock> Store<C> {
    /// Append a signal for the control plane to pick up.
    pub fn send_signal(&self, signal: SignalName) -> Result<(), StoreError> {
        let now = self.clock.epoch_ms() as i64;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO signals (signal, created_at) VALUES (?1, ?2)",
            (signal.as_str(), now),
        )?;
        Ok(())
    }

    /// Non-destructive check for whether a signal of this name is pending.
    pub fn peek_signal(&self, signal: SignalName) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM signals WHERE signal = ?1",
            [signal.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Atomically take the oldest pending row matching `signal`, if any.
    /// Exactly-one delivery: a second caller racing on the same signal name
    /// either gets the next row (if more were queued) or `false`.
    pub fn consume_signal(&self, signal: SignalName) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let id: Option<i64> = conn
            .query_row(
                "SELECT id FROM signals WHERE signal = ?1 ORDER BY id ASC LIMIT 1",
                [signal.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => {
                conn.execute("DELETE FROM signals WHERE id = ?1", [id])?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
