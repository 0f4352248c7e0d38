// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized records produced by the change-source adapter (component F).

use serde::{Deserialize, Serialize};

use crate::watch_root::WatchRoot;

/// Whether a changed path names a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    File,
    Dir,
}

/// A single normalized file-change record, as delivered by a query or
/// subscription response from the change-source service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChange {
    pub relative_path: String,
    pub size: u64,
    pub mtime_ms: u64,
    pub exists: bool,
    pub kind: ChangeKind,
    pub is_new: bool,
    /// Inode number, used to pair a removed+added half into a single MOVE.
    pub inode: u64,
    /// Present for files when the change-source computed it; always absent
    /// for directories.
    pub content_hash: Option<String>,
    #[serde(skip)]
    pub watch_root: Option<WatchRoot>,
}

impl FileChange {
    /// The local absolute path this change refers to, given its watch root.
    pub fn local_path(&self, watch_root: &WatchRoot) -> std::path::PathBuf {
        watch_root.local_path_for(&self.relative_path)
    }

    /// The mirrored remote path this change maps to.
    pub fn remote_path(&self, watch_root: &WatchRoot, remote_root: &str) -> String {
        watch_root.remote_path_for(remote_root, &self.relative_path)
    }
}

#[cfg(test)]
#[path = "file_change_tests.rs"]
mod tests;
