// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch roots: canonicalized local directories registered for sync.

use std::path::{Path, PathBuf};

/// An absolute, canonicalized local directory configured for sync, paired
/// with the remote-root prefix its mirror lives under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchRoot {
    /// Canonicalized absolute local path.
    local_path: PathBuf,
}

impl WatchRoot {
    /// Canonicalize `path` into a watch root.
    ///
    /// Fails if the path does not exist or cannot be resolved; watch roots
    /// are only ever constructed from directories the daemon has confirmed
    /// it can read.
    pub fn canonicalize(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self { local_path: path.as_ref().canonicalize()? })
    }

    /// Construct a watch root from an already-canonical path, without
    /// touching the filesystem. Used by tests and by code replaying a
    /// previously-persisted path.
    pub fn from_canonical(path: impl Into<PathBuf>) -> Self {
        Self { local_path: path.into() }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// The directory's base name, used as the remote mirror's top-level
    /// folder name under the configured remote-root prefix.
    pub fn base_name(&self) -> &str {
        self.local_path.file_name().and_then(|n| n.to_str()).unwrap_or("")
    }

    /// Compute `local_path/relative_path`.
    pub fn local_path_for(&self, relative_path: &str) -> PathBuf {
        self.local_path.join(relative_path)
    }

    /// Compute `remote_root/base_name(watch_root)/relative_path`, with no
    /// double slashes and an empty `remote_root` allowed.
    pub fn remote_path_for(&self, remote_root: &str, relative_path: &str) -> String {
        join_remote(&[remote_root, self.base_name(), relative_path])
    }
}

/// Join slash-delimited segments into a single remote path, dropping empty
/// segments and never producing a doubled `/`.
pub fn join_remote(segments: &[&str]) -> String {
    let mut out = String::new();
    for seg in segments {
        let seg = seg.trim_matches('/');
        if seg.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(seg);
    }
    out
}

/// Strip a leading `my_files/` prefix used by some path resolver callers,
/// per the resolver's documented contract.
pub fn strip_my_files_prefix(path: &str) -> &str {
    path.strip_prefix("my_files/").unwrap_or(path)
}

#[cfg(test)]
#[path = "watch_root_tests.rs"]
mod tests;
