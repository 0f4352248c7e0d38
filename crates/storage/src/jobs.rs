// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job store (C, `spec.md` §4.3, §6): the durable queue of intended remote
//! mutations. Enqueue applies the supersedure rules from
//! [`dsync_core::job::coalesce`]; dequeue is a single conditional `UPDATE`
//! so two executor tasks racing on the same store never claim the same row.

use dsync_core::{retry_delay, Clock, Coalesced, EventType, JobStatus, SyncJob};
use rand::thread_rng;
use rusqlite::{OptionalExtension, Row};

use crate::error::StoreError;
use crate::store::Store;

fn event_type_to_str(kind: EventType) -> &'static str {
    match kind {
        EventType::Create => "CREATE",
        EventType::Update => "UPDATE",
        EventType::Delete => "DELETE",
        EventType::Move => "MOVE",
    }
}

fn event_type_from_str(raw: &str) -> Result<EventType, StoreError> {
    match raw {
        "CREATE" => Ok(EventType::Create),
        "UPDATE" => Ok(EventType::Update),
        "DELETE" => Ok(EventType::Delete),
        "MOVE" => Ok(EventType::Move),
        other => Err(StoreError::Decode(format!("unknown event_type {other:?}"))),
    }
}

fn job_status_to_str(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "PENDING",
        JobStatus::Processing => "PROCESSING",
        JobStatus::Synced => "SYNCED",
        JobStatus::Blocked => "BLOCKED",
    }
}

fn job_status_from_str(raw: &str) -> Result<JobStatus, StoreError> {
    match raw {
        "PENDING" => Ok(JobStatus::Pending),
        "PROCESSING" => Ok(JobStatus::Processing),
        "SYNCED" => Ok(JobStatus::Synced),
        "BLOCKED" => Ok(JobStatus::Blocked),
        other => Err(StoreError::Decode(format!("unknown status {other:?}"))),
    }
}

const SELECT_COLUMNS: &str = "id, event_type, local_path, remote_path, old_remote_path, \
                               status, retry_at, n_retries, last_error, created_at";

fn row_to_job(row: &Row<'_>) -> rusqlite::Result<Result<SyncJob, StoreError>> {
    let event_type: String = row.get(1)?;
    let status: String = row.get(5)?;
    Ok((|| {
        Ok(SyncJob {
            id: row.get(0)?,
            event_type: event_type_from_str(&event_type)?,
            local_path: row.get(2)?,
            remote_path: row.get(3)?,
            old_remote_path: row.get(4)?,
            status: job_status_from_str(&status)?,
            retry_at: row.get(6)?,
            n_retries: row.get::<_, i64>(7)? as u32,
            last_error: row.get(8)?,
            created_at: row.get(9)?,
        })
    })())
}

/// A freshly normalized change ready to become (or supersede) a job.
pub struct JobInput<'a> {
    pub event_type: EventType,
    pub local_path: &'a str,
    pub remote_path: &'a str,
    pub old_remote_path: Option<&'a str>,
}

impl<C: Clock> Store<C> {
    /// Enqueue `input`, applying the §4.3 supersedure rules against any
    /// existing PENDING job for the same `local_path`. MOVE jobs never
    /// coalesce: they are always inserted as a distinct row, matching
    /// [`dsync_core::job::coalesce`]'s contract.
    pub fn enqueue_job(&self, input: JobInput<'_>) -> Result<i64, StoreError> {
        let now = self.clock.epoch_ms() as i64;
        let conn = self.conn.lock();

        let existing: Option<(i64, String)> = if input.event_type == EventType::Move {
            None
        } else {
            conn.query_row(
                "SELECT id, event_type FROM sync_jobs \
                 WHERE local_path = ?1 AND status = 'PENDING' AND event_type != 'MOVE'",
                [input.local_path],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
        };

        let existing_kind = match &existing {
            Some((_, raw)) => Some(event_type_from_str(raw)?),
            None => None,
        };

        match dsync_core::job::coalesce(existing_kind, input.event_type) {
            Coalesced::Insert => {
                conn.execute(
                    "INSERT INTO sync_jobs \
                     (event_type, local_path, remote_path, old_remote_path, status, retry_at, n_retries, created_at) \
                     VALUES (?1, ?2, ?3, ?4, 'PENDING', ?5, 0, ?5)",
                    (
                        event_type_to_str(input.event_type),
                        input.local_path,
                        input.remote_path,
                        input.old_remote_path,
                        now,
                    ),
                )?;
                Ok(conn.last_insert_rowid())
            }
            Coalesced::UpdateInPlace(new_kind) => {
                let (id, _) = existing.expect("UpdateInPlace implies an existing row");
                conn.execute(
                    "UPDATE sync_jobs SET event_type = ?1, remote_path = ?2, old_remote_path = ?3, \
                     retry_at = ?4, n_retries = 0, last_error = NULL WHERE id = ?5",
                    (
                        event_type_to_str(new_kind),
                        input.remote_path,
                        input.old_remote_path,
                        now,
                        id,
                    ),
                )?;
                Ok(id)
            }
        }
    }

    /// Atomically claim the oldest due PENDING job, transitioning it to
    /// PROCESSING, or `None` if there's nothing ready.
    ///
    /// The `UPDATE ... WHERE id = (SELECT ...)` pattern guarantees exactly
    /// one caller wins the row even if two executor loops poll at the same
    /// instant, since SQLite serializes writers through the store's mutex
    /// and the connection's own locking.
    pub fn get_next_pending_job(&self) -> Result<Option<SyncJob>, StoreError> {
        let now = self.clock.epoch_ms() as i64;
        let conn = self.conn.lock();
        let sql = format!(
            "UPDATE sync_jobs SET status = 'PROCESSING' \
             WHERE id = ( \
                 SELECT id FROM sync_jobs \
                 WHERE status = 'PENDING' AND retry_at <= ?1 \
                 ORDER BY retry_at ASC, id ASC LIMIT 1 \
             ) \
             RETURNING {SELECT_COLUMNS}"
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let mut rows = stmt.query([now])?;
        match rows.next()? {
            Some(row) => row_to_job(row)?.map(Some),
            None => Ok(None),
        }
    }

    pub fn mark_synced(&self, job_id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE sync_jobs SET status = 'SYNCED', last_error = NULL WHERE id = ?1",
            [job_id],
        )?;
        Ok(())
    }

    /// Schedule a retry after a transient failure (`spec.md` §4.3, §8): bump
    /// `n_retries`, compute the next `retry_at` via the shared backoff
    /// schedule, and stash `error` for operator visibility. Jobs that have
    /// already exhausted [`dsync_core::MAX_RETRIES`] are blocked instead.
    pub fn schedule_retry(&self, job_id: i64, error: &str) -> Result<JobStatus, StoreError> {
        let conn = self.conn.lock();
        let n_retries: i64 = conn.query_row(
            "SELECT n_retries FROM sync_jobs WHERE id = ?1",
            [job_id],
            |row| row.get(0),
        )?;
        let n_retries = n_retries as u32;

        if n_retries >= dsync_core::MAX_RETRIES {
            conn.execute(
                "UPDATE sync_jobs SET status = 'BLOCKED', last_error = ?1 WHERE id = ?2",
                (error, job_id),
            )?;
            return Ok(JobStatus::Blocked);
        }

        let delay = retry_delay(n_retries, &mut thread_rng());
        let retry_at = self.clock.epoch_ms() as i64 + delay.as_millis() as i64;
        conn.execute(
            "UPDATE sync_jobs SET status = 'PENDING', n_retries = n_retries + 1, \
             retry_at = ?1, last_error = ?2 WHERE id = ?3",
            (retry_at, error, job_id),
        )?;
        Ok(JobStatus::Pending)
    }

    /// Block a job outright (e.g. NAME_CONFLICT, QUOTA_EXCEEDED): no further
    /// retries, surfaced to the operator until manually cleared.
    pub fn mark_blocked(&self, job_id: i64, error: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE sync_jobs SET status = 'BLOCKED', last_error = ?1 WHERE id = ?2",
            (error, job_id),
        )?;
        Ok(())
    }

    /// Counts per status, for the control plane's status report.
    pub fn get_counts(&self) -> Result<JobCounts, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT status, COUNT(*) FROM sync_jobs GROUP BY status",
        )?;
        let mut counts = JobCounts::default();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let status: String = row.get(0)?;
            let n: i64 = row.get(1)?;
            match job_status_from_str(&status)? {
                JobStatus::Pending => counts.pending = n,
                JobStatus::Processing => counts.processing = n,
                JobStatus::Synced => counts.synced = n,
                JobStatus::Blocked => counts.blocked = n,
            }
        }
        Ok(counts)
    }

    pub fn list_recent_synced(&self, limit: u32) -> Result<Vec<SyncJob>, StoreError> {
        self.list_by_status("SYNCED", "id DESC", limit)
    }

    pub fn list_blocked(&self) -> Result<Vec<SyncJob>, StoreError> {
        self.list_by_status("BLOCKED", "id ASC", u32::MAX)
    }

    pub fn list_processing(&self) -> Result<Vec<SyncJob>, StoreError> {
        self.list_by_status("PROCESSING", "id ASC", u32::MAX)
    }

    fn list_by_status(&self, status: &str, order_by: &str, limit: u32) -> Result<Vec<SyncJob>, StoreError> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM sync_jobs WHERE status = ?1 ORDER BY {order_by} LIMIT ?2"
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let mut rows = stmt.query((status, limit))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(row_to_job(row)??);
        }
        Ok(out)
    }
}

/// Snapshot of job counts by status, for `dsync status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct JobCounts {
    pub pending: i64,
    pub processing: i64,
    pub synced: i64,
    pub blocked: i64,
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
