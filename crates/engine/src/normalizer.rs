// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event normalizer (G, `spec.md` §4.7): turns a batch of raw file records
//! from the change-source adapter into canonical CREATE/UPDATE/DELETE/MOVE
//! changes, local/remote paths resolved.

use std::collections::HashSet;

use dsync_core::{ChangeKind, EventType, FileChange, WatchRoot};
use dsync_wire::{WireFileKind, WireFileRecord};

/// A single normalized change ready to be enqueued as (or fold into) a
/// sync job.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedChange {
    pub event_type: EventType,
    pub local_path: String,
    pub remote_path: String,
    /// Only set for MOVE: the remote path before the move.
    pub old_remote_path: Option<String>,
}

fn to_file_change(watch_root: &WatchRoot, record: &WireFileRecord) -> FileChange {
    FileChange {
        relative_path: record.name.clone(),
        size: record.size,
        mtime_ms: record.mtime_ms,
        exists: record.exists,
        kind: match record.kind {
            WireFileKind::File => ChangeKind::File,
            WireFileKind::Dir => ChangeKind::Dir,
        },
        is_new: record.is_new,
        inode: record.inode,
        content_hash: record.content_hash.clone(),
        watch_root: Some(watch_root.clone()),
    }
}

fn derive_event_type(change: &FileChange) -> EventType {
    if !change.exists {
        EventType::Delete
    } else if change.kind == ChangeKind::Dir {
        EventType::Create
    } else {
        EventType::Update
    }
}

/// Normalize one batch of wire records into canonical changes.
///
/// MOVE is detected when a removed record (`exists == false`) and an added
/// record (`exists == true, is_new == true`) in the same batch share an
/// `inode`; the pair collapses into one MOVE carrying both remote paths.
/// Unpaired halves fall through to ordinary DELETE / CREATE / UPDATE
/// (`spec.md` §4.7).
pub fn normalize_batch(
    watch_root: &WatchRoot,
    remote_root: &str,
    records: &[WireFileRecord],
) -> Vec<NormalizedChange> {
    let changes: Vec<FileChange> = records.iter().map(|r| to_file_change(watch_root, r)).collect();

    let removed: Vec<usize> = (0..changes.len()).filter(|&i| !changes[i].exists).collect();
    let added: Vec<usize> =
        (0..changes.len()).filter(|&i| changes[i].exists && changes[i].is_new).collect();

    let mut paired = HashSet::new();
    let mut out = Vec::with_capacity(changes.len());

    for &ri in &removed {
        if paired.contains(&ri) {
            continue;
        }
        let removed_change = &changes[ri];
        let matched = added
            .iter()
            .copied()
            .find(|&ai| !paired.contains(&ai) && changes[ai].inode == removed_change.inode);
        if let Some(ai) = matched {
            paired.insert(ri);
            paired.insert(ai);
            let added_change = &changes[ai];
            out.push(NormalizedChange {
                event_type: EventType::Move,
                local_path: added_change.local_path(watch_root).to_string_lossy().into_owned(),
                remote_path: added_change.remote_path(watch_root, remote_root),
                old_remote_path: Some(removed_change.remote_path(watch_root, remote_root)),
            });
        }
    }

    for (i, change) in changes.iter().enumerate() {
        if paired.contains(&i) {
            continue;
        }
        out.push(NormalizedChange {
            event_type: derive_event_type(change),
            local_path: change.local_path(watch_root).to_string_lossy().into_owned(),
            remote_path: change.remote_path(watch_root, remote_root),
            old_remote_path: None,
        });
    }

    out
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
