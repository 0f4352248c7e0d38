// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote operations (E, `spec.md` §4.5): create-folder, upload-file (new
//! and new-revision), trash/delete, move, rename — the mutating half of
//! the drive client capability, composed with the path resolver (D) to
//! translate a job's `local_path`/`remote_path` into the right calls.

use std::path::Path;

use dsync_adapters::DriveClient;
use dsync_core::SyncError;

use crate::resolver::PathResolver;

/// Create (or reuse) every folder on `remote_path`, idempotently.
pub async fn create_folder_path<Dr: DriveClient>(
    drive: &Dr,
    remote_path: &str,
) -> Result<String, SyncError> {
    PathResolver::new(drive).ensure_path(remote_path).await
}

/// Upload `local_path` to `remote_path`, creating any missing parent
/// folders first. Looks up an existing file by name under the parent to
/// decide between a fresh upload and a new revision.
pub async fn upload_file<Dr: DriveClient>(
    drive: &Dr,
    local_path: &Path,
    remote_path: &str,
) -> Result<String, SyncError> {
    let (parent_path, name) = split_remote_path(remote_path)?;
    let resolver = PathResolver::new(drive);
    let parent_id = resolver.ensure_path(parent_path).await?;
    let existing = resolver.find_file_by_name(&parent_id, name).await?;
    drive.upload_file(&parent_id, name, existing.as_ref().map(|n| n.id.as_str()), local_path).await
}

/// Trash (or hard-delete, if `permanent`) `remote_path`, resolving it
/// first. A missing parent or target is success, not failure — the
/// executor's DELETE handler relies on this (`spec.md` §4.8).
pub async fn delete_path<Dr: DriveClient>(
    drive: &Dr,
    remote_path: &str,
    permanent: bool,
) -> Result<(), SyncError> {
    let (parent_path, name) = split_remote_path(remote_path)?;
    let resolver = PathResolver::new(drive);
    let Some(parent_id) = resolver.resolve_path(parent_path).await? else {
        return Ok(());
    };
    let target = match resolver.find_file_by_name(&parent_id, name).await? {
        Some(node) => Some(node),
        None => resolver.find_folder_by_name(&parent_id, name).await?,
    };
    let Some(target) = target else {
        return Ok(());
    };
    if permanent {
        drive.delete(&target.id).await
    } else {
        drive.trash(&target.id).await
    }
}

/// Move (and optionally rename) the node at `old_remote_path` to
/// `new_remote_path`.
pub async fn move_path<Dr: DriveClient>(
    drive: &Dr,
    old_remote_path: &str,
    new_remote_path: &str,
) -> Result<(), SyncError> {
    let (old_parent_path, old_name) = split_remote_path(old_remote_path)?;
    let (new_parent_path, new_name) = split_remote_path(new_remote_path)?;
    let resolver = PathResolver::new(drive);

    let old_parent_id = resolver
        .resolve_path(old_parent_path)
        .await?
        .ok_or_else(|| SyncError::not_found(format!("source parent {old_parent_path:?} not found")))?;
    let node = match resolver.find_file_by_name(&old_parent_id, old_name).await? {
        Some(node) => node,
        None => resolver
            .find_folder_by_name(&old_parent_id, old_name)
            .await?
            .ok_or_else(|| SyncError::not_found(format!("{old_remote_path} not found")))?,
    };

    let new_parent_id = resolver.ensure_path(new_parent_path).await?;
    if new_parent_id != old_parent_id {
        drive.move_node(&node.id, &new_parent_id).await?;
    }
    if new_name != old_name {
        drive.rename(&node.id, new_name).await?;
    }
    Ok(())
}

/// Split a slash-delimited remote path into its parent path and base name.
fn split_remote_path(remote_path: &str) -> Result<(&str, &str), SyncError> {
    let trimmed = remote_path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((parent, name)) => Ok((parent, name)),
        None => Ok(("", trimmed)),
    }
}

#[cfg(test)]
#[path = "remote_ops_tests.rs"]
mod tests;
