// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock store (A, `spec.md` §4.1): per-directory change-source cookies
//! persisted across restarts so F can resume a watch without re-scanning.

use dsync_core::Clock;

use crate::error::StoreError;
use crate::store::Store;

impl<C: Clock> Store<C> {
    /// Fetch the last-known clock for `directory`, if one was ever saved.
    pub fn get_clock(&self, directory: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT clock FROM clocks WHERE directory = ?1")?;
        let mut rows = stmt.query([directory])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Persist `clock` for `directory`, overwriting any previous value.
    ///
    /// A no-op when `dry_run` is set (`spec.md` §4.1): the daemon can watch
    /// a directory without ever advancing its resume point, useful for
    /// inspection tooling that must not perturb a live sync.
    pub fn set_clock(&self, directory: &str, clock: &str, dry_run: bool) -> Result<(), StoreError> {
        if dry_run {
            return Ok(());
        }
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO clocks (directory, clock) VALUES (?1, ?2)
             ON CONFLICT(directory) DO UPDATE SET clock = excluded.clock",
            (directory, clock),
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "clocks_tests.rs"]
mod tests;
