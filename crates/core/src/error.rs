// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by every crate in the workspace (`spec.md` §7).
//!
//! Adapter-specific errors (drive client, change-source client, store)
//! convert into [`SyncError`] at the boundary, so the executor's retry
//! policy has one stable enum to switch on regardless of which adapter
//! raised the error.

use thiserror::Error;

/// Stable error kind, independent of the message — the executor's retry
/// policy switches on this, not on `Display` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O, timeout, 5xx: retry with backoff.
    NetworkTransient,
    /// Credential rejected: retry once after re-auth, else BLOCKED.
    AuthExpired,
    /// Remote node vanished: success for DELETE, BLOCKED for others.
    NotFound,
    /// Duplicate name on rename/create: BLOCKED with an operator-visible
    /// reason.
    NameConflict,
    /// Remote storage full: BLOCKED.
    QuotaExceeded,
    /// Child listing returned a degraded entry; the entry is surfaced to
    /// the caller and the parent operation continues.
    DecryptionFailure,
    /// Cannot read the local file: retry with backoff.
    LocalIo,
    /// Change-source is down: retry the connection, pause F until healthy.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Whether the executor should schedule an ordinary backoff retry for
    /// this kind (as opposed to a one-shot retry, or none at all).
    pub fn retries_with_backoff(&self) -> bool {
        matches!(self, ErrorKind::NetworkTransient | ErrorKind::LocalIo)
    }

    /// Whether this kind gets exactly one retry (after re-auth) before
    /// blocking.
    pub fn retries_once(&self) -> bool {
        matches!(self, ErrorKind::AuthExpired)
    }

    /// Whether this kind is terminal for a DELETE job specifically (a
    /// missing node is success, not failure, when the job's intent was to
    /// remove it).
    pub fn is_success_for_delete(&self) -> bool {
        matches!(self, ErrorKind::NotFound)
    }
}

/// A sync-engine error: the error kind plus a human-readable,
/// operator-visible message.
#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct SyncError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SyncError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn network_transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkTransient, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn name_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameConflict, message)
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QuotaExceeded, message)
    }

    pub fn local_io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LocalIo, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    pub fn auth_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthExpired, message)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
