// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flag store (B, `spec.md` §4.2): durable booleans-with-payload, the
//! counterpart to the signal bus's one-shot messages. `RUNNING` carries the
//! daemon's PID so a sibling process can check liveness without IPC.

use dsync_core::{Clock, FlagName, FlagVariant};

use crate::error::StoreError;
use crate::store::Store;

impl<C: Clock> Store<C> {
    pub fn set_flag(&self, name: FlagName, variant: Option<&FlagVariant>) -> Result<(), StoreError> {
        let payload = variant
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO flags (name, variant) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET variant = excluded.variant",
            (name.as_str(), payload),
        )?;
        Ok(())
    }

    /// Clear `name`. When `variants` is `Some`, the flag is only cleared if
    /// its current variant matches one of the listed ones — clearing a
    /// different writer's flag unconditionally would race it. `None` always
    /// clears, regardless of (or absence of) a current variant.
    pub fn clear_flag(&self, name: FlagName, variants: Option<&[FlagVariant]>) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        match variants {
            None => {
                conn.execute("DELETE FROM flags WHERE name = ?1", [name.as_str()])?;
            }
            Some(variants) => {
                let mut stmt = conn.prepare_cached("SELECT variant FROM flags WHERE name = ?1")?;
                let mut rows = stmt.query([name.as_str()])?;
                let Some(row) = rows.next()? else { return Ok(()) };
                let raw: Option<String> = row.get(0)?;
                let current = raw
                    .map(|s| serde_json::from_str::<FlagVariant>(&s).map_err(|e| StoreError::Decode(e.to_string())))
                    .transpose()?;
                drop(rows);
                drop(stmt);
                if current.is_some_and(|c| variants.contains(&c)) {
                    conn.execute("DELETE FROM flags WHERE name = ?1", [name.as_str()])?;
                }
            }
        }
        Ok(())
    }

    pub fn has_flag(&self, name: FlagName) -> Result<bool, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM flags WHERE name = ?1",
            [name.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Fetch a flag's variant payload, if it's set and carries one.
    pub fn get_flag_data(&self, name: FlagName) -> Result<Option<FlagVariant>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached("SELECT variant FROM flags WHERE name = ?1")?;
        let mut rows = stmt.query([name.as_str()])?;
        match rows.next()? {
            Some(row) => {
                let raw: Option<String> = row.get(0)?;
                raw.map(|s| serde_json::from_str(&s).map_err(|e| StoreError::Decode(e.to_string())))
                    .transpose()
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
