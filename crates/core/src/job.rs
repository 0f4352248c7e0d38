// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync job state machine and supersedure rules.
//!
//! A [`SyncJob`] is the persisted unit of intended remote mutation. The
//! store (`dsync-storage`) owns the actual rows; this module owns the pure
//! logic of what a newly-enqueued event does to an existing PENDING job for
//! the same path (§4.3 of the design), which the store applies inside a
//! transaction.

use serde::{Deserialize, Serialize};

use crate::macros::simple_display;

/// The kind of remote mutation a sync job represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Create,
    Update,
    Delete,
    Move,
}

simple_display! {
    EventType {
        Create => "CREATE",
        Update => "UPDATE",
        Delete => "DELETE",
        Move => "MOVE",
    }
}

/// Durable status of a sync job row.
///
/// `Processing` is transient: it only ever exists between the executor
/// claiming a row and resolving it to `Synced`, back to `Pending` (retry),
/// or `Blocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Pending,
    Processing,
    Synced,
    Blocked,
}

simple_display! {
    JobStatus {
        Pending => "PENDING",
        Processing => "PROCESSING",
        Synced => "SYNCED",
        Blocked => "BLOCKED",
    }
}

/// A persisted sync job, mirroring the `sync_jobs` table (`spec.md` §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: i64,
    pub event_type: EventType,
    pub local_path: String,
    pub remote_path: String,
    /// Present only for `Move` jobs: the remote path before the move.
    pub old_remote_path: Option<String>,
    pub status: JobStatus,
    pub retry_at: i64,
    pub n_retries: u32,
    pub last_error: Option<String>,
    pub created_at: i64,
}

/// Result of applying the §4.3 supersedure rules to an existing PENDING job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coalesced {
    /// No PENDING job exists for this path: insert a fresh row.
    Insert,
    /// A PENDING job exists: update it in place to this event type and
    /// reset its retry fields, keeping its row id.
    UpdateInPlace(EventType),
}

/// Apply the enqueue-time supersedure rules from `spec.md` §4.3.
///
/// `existing` is the event type of a PENDING job already queued for the
/// same `local_path`, if any. `MOVE` never coalesces with a non-MOVE event
/// for the same path — it is always a distinct row — so this function is
/// never called with `incoming == EventType::Move` nor `existing ==
/// Some(EventType::Move)`; callers enforce that before calling.
pub fn coalesce(existing: Option<EventType>, incoming: EventType) -> Coalesced {
    debug_assert_ne!(incoming, EventType::Move, "MOVE never coalesces");
    debug_assert_ne!(existing, Some(EventType::Move), "MOVE never coalesces");

    match existing {
        None => Coalesced::Insert,
        Some(EventType::Delete) => match incoming {
            EventType::Create | EventType::Update => Coalesced::UpdateInPlace(EventType::Update),
            EventType::Delete => Coalesced::UpdateInPlace(EventType::Delete),
            EventType::Move => unreachable!(),
        },
        Some(EventType::Create) | Some(EventType::Update) => match incoming {
            EventType::Delete => Coalesced::UpdateInPlace(EventType::Delete),
            EventType::Create | EventType::Update => Coalesced::UpdateInPlace(EventType::Update),
            EventType::Move => unreachable!(),
        },
        Some(EventType::Move) => unreachable!(),
    }
}

impl SyncJob {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Synced | JobStatus::Blocked)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
