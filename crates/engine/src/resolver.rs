// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path resolver (D, `spec.md` §4.4): translates a slash-delimited logical
//! path into a folder node id in the remote tree.

use dsync_adapters::{DriveClient, DriveNode};
use dsync_core::SyncError;

/// Strip an optional leading `my_files/` prefix and split into components,
/// dropping empty segments from doubled slashes.
fn normalize_components(remote_path: &str) -> Vec<&str> {
    let trimmed = remote_path.strip_prefix("my_files/").unwrap_or(remote_path);
    trimmed.split('/').filter(|c| !c.is_empty()).collect()
}

pub struct PathResolver<'a, Dr: DriveClient> {
    drive: &'a Dr,
}

impl<'a, Dr: DriveClient> PathResolver<'a, Dr> {
    pub fn new(drive: &'a Dr) -> Self {
        Self { drive }
    }

    /// Walk components from the root, creating any missing folder. Once a
    /// component is created, every subsequent component is created too —
    /// the parent is known-empty so searching it would be wasted work.
    pub async fn ensure_path(&self, remote_path: &str) -> Result<String, SyncError> {
        let mut current = self.drive.root_id().to_string();
        let mut creating = false;
        for name in normalize_components(remote_path) {
            if creating {
                current = self.drive.create_folder(&current, name).await?;
                continue;
            }
            match self.find_folder_by_name(&current, name).await? {
                Some(node) => current = node.id,
                None => {
                    current = self.drive.create_folder(&current, name).await?;
                    creating = true;
                }
            }
        }
        Ok(current)
    }

    /// Same walk as [`Self::ensure_path`], but a missing component returns
    /// `Ok(None)` instead of creating one.
    pub async fn resolve_path(&self, remote_path: &str) -> Result<Option<String>, SyncError> {
        let mut current = self.drive.root_id().to_string();
        for name in normalize_components(remote_path) {
            match self.find_folder_by_name(&current, name).await? {
                Some(node) => current = node.id,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    pub async fn find_folder_by_name(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<Option<DriveNode>, SyncError> {
        self.find_by_name(parent_id, name, true).await
    }

    pub async fn find_file_by_name(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<Option<DriveNode>, SyncError> {
        self.find_by_name(parent_id, name, false).await
    }

    /// Full-iteration rule (`spec.md` §4.4): the whole child iterator is
    /// walked even after a match, never an early `return` from inside the
    /// loop — the drive client only marks a folder's children-complete
    /// cache once the enumeration it returned has been consumed to
    /// exhaustion.
    ///
    /// A degraded child (`ErrorKind::DecryptionFailure`) doesn't stop that
    /// walk, but if no matching node turns up among the ones that *did*
    /// decode, a degraded entry means the search was inconclusive — it
    /// might have been the one we were looking for — so that error is
    /// surfaced to the caller instead of reporting "not found" (`spec.md`
    /// §7).
    async fn find_by_name(
        &self,
        parent_id: &str,
        name: &str,
        want_folder: bool,
    ) -> Result<Option<DriveNode>, SyncError> {
        let children = self.drive.list_children(parent_id).await?;
        let mut found = None;
        let mut degraded = None;
        for child in children {
            match child {
                Ok(child) => {
                    if child.is_folder == want_folder && child.name == name {
                        found = Some(child);
                    }
                }
                Err(err) => {
                    tracing::warn!(parent_id, error = %err, "skipping a degraded child while listing");
                    degraded.get_or_insert(err);
                }
            }
        }
        match found {
            Some(node) => Ok(Some(node)),
            None => match degraded {
                Some(err) => Err(err),
                None => Ok(None),
            },
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
