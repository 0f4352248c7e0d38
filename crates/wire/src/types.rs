// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types for a single file record as reported by the change-source
//! service, and the query expression used to select them (`spec.md` §4.6).

use serde::{Deserialize, Serialize};

/// A file record as reported over the wire. Field names match what the
/// change-source service emits, not `dsync_core::FileChange`'s normalized
/// names — `dsync-engine`'s normalizer is the seam that translates between
/// the two (`spec.md` §4.7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFileRecord {
    pub name: String,
    pub size: u64,
    pub mtime_ms: u64,
    pub exists: bool,
    #[serde(rename = "type")]
    pub kind: WireFileKind,
    #[serde(rename = "new")]
    pub is_new: bool,
    #[serde(rename = "ino")]
    pub inode: u64,
    #[serde(default)]
    pub content_hash: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireFileKind {
    #[serde(rename = "f")]
    File,
    #[serde(rename = "d")]
    Dir,
}

/// The fixed set of fields requested on every query (`spec.md` §4.6): name,
/// size, mtime_ms, exists, type, new, ino, content_hash.
pub const QUERY_FIELDS: &[&str] =
    &["name", "size", "mtime_ms", "exists", "type", "new", "ino", "content_hash"];

/// Matches any file or directory node — the only expression the daemon
/// issues (`spec.md` §4.6: `expression: any(file, dir)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryExpression {
    AnyFileOrDir,
}
