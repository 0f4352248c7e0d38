// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders shared across crates. Gated behind `test-support` so
//! downstream crates can depend on `dsync-core` with the feature enabled in
//! their `[dev-dependencies]` only.

use crate::file_change::{ChangeKind, FileChange};
use crate::job::{EventType, JobStatus, SyncJob};

/// Build a [`FileChange`] with sensible test defaults.
pub struct FileChangeBuilder {
    relative_path: String,
    size: u64,
    mtime_ms: u64,
    exists: bool,
    kind: ChangeKind,
    is_new: bool,
    inode: u64,
    content_hash: Option<String>,
}

impl Default for FileChangeBuilder {
    fn default() -> Self {
        Self {
            relative_path: "a.txt".into(),
            size: 0,
            mtime_ms: 0,
            exists: true,
            kind: ChangeKind::File,
            is_new: true,
            inode: 1,
            content_hash: None,
        }
    }
}

impl FileChangeBuilder {
    pub fn relative_path(mut self, v: impl Into<String>) -> Self {
        self.relative_path = v.into();
        self
    }
    pub fn size(mut self, v: u64) -> Self {
        self.size = v;
        self
    }
    pub fn exists(mut self, v: bool) -> Self {
        self.exists = v;
        self
    }
    pub fn kind(mut self, v: ChangeKind) -> Self {
        self.kind = v;
        self
    }
    pub fn inode(mut self, v: u64) -> Self {
        self.inode = v;
        self
    }
    pub fn content_hash(mut self, v: impl Into<String>) -> Self {
        self.content_hash = Some(v.into());
        self
    }

    pub fn build(self) -> FileChange {
        FileChange {
            relative_path: self.relative_path,
            size: self.size,
            mtime_ms: self.mtime_ms,
            exists: self.exists,
            kind: self.kind,
            is_new: self.is_new,
            inode: self.inode,
            content_hash: self.content_hash,
            watch_root: None,
        }
    }
}

/// Build a [`SyncJob`] with sensible test defaults.
pub struct SyncJobBuilder {
    id: i64,
    event_type: EventType,
    local_path: String,
    remote_path: String,
    old_remote_path: Option<String>,
    status: JobStatus,
    retry_at: i64,
    n_retries: u32,
    last_error: Option<String>,
    created_at: i64,
}

impl Default for SyncJobBuilder {
    fn default() -> Self {
        Self {
            id: 1,
            event_type: EventType::Update,
            local_path: "/watch/a.txt".into(),
            remote_path: "a.txt".into(),
            old_remote_path: None,
            status: JobStatus::Pending,
            retry_at: 0,
            n_retries: 0,
            last_error: None,
            created_at: 0,
        }
    }
}

impl SyncJobBuilder {
    pub fn id(mut self, v: i64) -> Self {
        self.id = v;
        self
    }
    pub fn event_type(mut self, v: EventType) -> Self {
        self.event_type = v;
        self
    }
    pub fn status(mut self, v: JobStatus) -> Self {
        self.status = v;
        self
    }
    pub fn n_retries(mut self, v: u32) -> Self {
        self.n_retries = v;
        self
    }
    pub fn retry_at(mut self, v: i64) -> Self {
        self.retry_at = v;
        self
    }

    pub fn build(self) -> SyncJob {
        SyncJob {
            id: self.id,
            event_type: self.event_type,
            local_path: self.local_path,
            remote_path: self.remote_path,
            old_remote_path: self.old_remote_path,
            status: self.status,
            retry_at: self.retry_at,
            n_retries: self.n_retries,
            last_error: self.last_error,
            created_at: self.created_at,
        }
    }
}
