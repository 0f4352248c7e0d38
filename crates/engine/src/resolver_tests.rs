// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dsync_adapters::{ChildIter, DriveNode, FakeDriveClient};
use dsync_core::SyncError;

use super::*;

/// Wraps a [`DriveClient`] and counts how many child items its
/// `list_children` iterators actually yield, to verify the full-iteration
/// rule (`spec.md` §4.4, §8) structurally rather than by inspection: a
/// resolver that stopped at the first match would under-count.
#[derive(Clone)]
struct CountingDriveClient<Dr> {
    inner: Dr,
    consumed: Arc<AtomicUsize>,
}

impl<Dr: DriveClient> CountingDriveClient<Dr> {
    fn new(inner: Dr) -> Self {
        Self { inner, consumed: Arc::new(AtomicUsize::new(0)) }
    }

    fn consumed(&self) -> usize {
        self.consumed.load(Ordering::SeqCst)
    }
}

struct CountingIter {
    inner: ChildIter,
    consumed: Arc<AtomicUsize>,
}

impl Iterator for CountingIter {
    type Item = Result<DriveNode, SyncError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.consumed.fetch_add(1, Ordering::SeqCst);
        }
        item
    }
}

#[async_trait]
impl<Dr: DriveClient> DriveClient for CountingDriveClient<Dr> {
    fn root_id(&self) -> &str {
        self.inner.root_id()
    }

    async fn list_children(&self, folder_id: &str) -> Result<ChildIter, SyncError> {
        let inner = self.inner.list_children(folder_id).await?;
        Ok(Box::new(CountingIter { inner, consumed: self.consumed.clone() }))
    }

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<String, SyncError> {
        self.inner.create_folder(parent_id, name).await
    }

    async fn upload_file(
        &self,
        parent_id: &str,
        name: &str,
        existing_file_id: Option<&str>,
        local_path: &Path,
    ) -> Result<String, SyncError> {
        self.inner.upload_file(parent_id, name, existing_file_id, local_path).await
    }

    async fn trash(&self, node_id: &str) -> Result<(), SyncError> {
        self.inner.trash(node_id).await
    }

    async fn delete(&self, node_id: &str) -> Result<(), SyncError> {
        self.inner.delete(node_id).await
    }

    async fn move_node(&self, node_id: &str, new_parent_id: &str) -> Result<(), SyncError> {
        self.inner.move_node(node_id, new_parent_id).await
    }

    async fn rename(&self, node_id: &str, new_name: &str) -> Result<(), SyncError> {
        self.inner.rename(node_id, new_name).await
    }
}

#[tokio::test]
async fn find_by_name_consumes_every_child_even_after_an_early_match() {
    let inner = FakeDriveClient::new();
    let root = inner.root_id().to_string();
    inner.create_folder(&root, "aaa").await.unwrap();
    inner.create_folder(&root, "target").await.unwrap();
    inner.create_folder(&root, "zzz").await.unwrap();

    let drive = CountingDriveClient::new(inner);
    let resolver = PathResolver::new(&drive);
    resolver.find_folder_by_name(&root, "target").await.unwrap().unwrap();

    assert_eq!(drive.consumed(), 3, "the full child iterator must be drained, not stopped at the match");
}

#[tokio::test]
async fn find_by_name_surfaces_a_degraded_child_when_no_match_is_found() {
    let inner = FakeDriveClient::new();
    let root = inner.root_id().to_string();
    inner.create_folder(&root, "unrelated").await.unwrap();
    inner.inject_degraded_child(&root, "corrupt name");

    let resolver = PathResolver::new(&inner);
    let err = resolver.find_folder_by_name(&root, "missing").await.unwrap_err();
    assert_eq!(err.kind, dsync_core::ErrorKind::DecryptionFailure);
}

#[tokio::test]
async fn find_by_name_ignores_a_degraded_child_once_the_real_match_is_found() {
    let inner = FakeDriveClient::new();
    let root = inner.root_id().to_string();
    let folder_id = inner.create_folder(&root, "target").await.unwrap();
    inner.inject_degraded_child(&root, "corrupt name");

    let resolver = PathResolver::new(&inner);
    let found = resolver.find_folder_by_name(&root, "target").await.unwrap().unwrap();
    assert_eq!(found.id, folder_id);
}

#[tokio::test]
async fn ensure_path_creates_missing_folders() {
    let drive = FakeDriveClient::new();
    let resolver = PathResolver::new(&drive);
    let folder_id = resolver.ensure_path("a/b/c").await.unwrap();

    let node = drive.node(&folder_id).unwrap();
    assert_eq!(node.name, "c");
    assert!(node.is_folder);
}

#[tokio::test]
async fn ensure_path_reuses_existing_folders() {
    let drive = FakeDriveClient::new();
    let resolver = PathResolver::new(&drive);
    let first = resolver.ensure_path("a/b").await.unwrap();
    let second = resolver.ensure_path("a/b").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn ensure_path_strips_my_files_prefix() {
    let drive = FakeDriveClient::new();
    let resolver = PathResolver::new(&drive);
    let with_prefix = resolver.ensure_path("my_files/a/b").await.unwrap();
    let without_prefix = resolver.ensure_path("a/b").await.unwrap();
    assert_eq!(with_prefix, without_prefix);
}

#[tokio::test]
async fn resolve_path_returns_none_for_missing_component() {
    let drive = FakeDriveClient::new();
    let resolver = PathResolver::new(&drive);
    assert_eq!(resolver.resolve_path("nope/here").await.unwrap(), None);
}

#[tokio::test]
async fn resolve_path_finds_existing_deep_folder() {
    let drive = FakeDriveClient::new();
    let resolver = PathResolver::new(&drive);
    let created = resolver.ensure_path("a/b").await.unwrap();
    let resolved = resolver.resolve_path("a/b").await.unwrap();
    assert_eq!(resolved, Some(created));
}

#[tokio::test]
async fn find_file_by_name_ignores_same_named_folder() {
    let drive = FakeDriveClient::new();
    let resolver = PathResolver::new(&drive);
    let root = drive.root_id().to_string();
    drive.create_folder(&root, "dup").await.unwrap();
    assert_eq!(resolver.find_file_by_name(&root, "dup").await.unwrap(), None);
    assert!(resolver.find_folder_by_name(&root, "dup").await.unwrap().is_some());
}
