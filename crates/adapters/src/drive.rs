// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The drive client capability (E, D; `spec.md` §4.4, §4.5, §6).
//!
//! The remote side is an opaque, encrypted object store reached through a
//! black-box client library (`spec.md` §1: "the daemon does not itself
//! implement the wire protocol or cryptography"). This module owns only
//! the capability interface the rest of the engine programs against,
//! letting the engine depend on a trait rather than a concrete remote
//! backend.

use std::path::Path;

use async_trait::async_trait;
use dsync_core::SyncError;

/// A node in the remote tree: a folder or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveNode {
    pub id: String,
    pub name: String,
    pub is_folder: bool,
}

/// One child of a listing: either a decoded node, or a per-entry failure
/// (`spec.md` §7 `DecryptionFailure`) that doesn't stop the rest of the
/// listing from being walked.
pub type ChildResult = Result<DriveNode, SyncError>;

/// A folder's children, lazily exhausted. The path resolver (D) is the one
/// doing the enumerating (`spec.md` §4.4: full iteration is "a contract
/// between D and the drive client"), so this is a boxed iterator rather
/// than a pre-collected `Vec` — a caller that stopped at the first match
/// would visibly under-consume it.
pub type ChildIter = Box<dyn Iterator<Item = ChildResult> + Send>;

/// Capability set the path resolver (D) and remote operations (E) need
/// from the drive client, per `spec.md` §6.
#[async_trait]
pub trait DriveClient: Clone + Send + Sync + 'static {
    /// The remote tree's root folder id.
    fn root_id(&self) -> &str;

    /// List every child of `folder_id`. The full-iteration rule (`spec.md`
    /// §4.4) requires callers to walk the returned iterator to exhaustion
    /// before acting on a match, so the client can mark its
    /// children-complete cache; a single undecryptable child surfaces as
    /// an `Err` item rather than failing the whole listing.
    async fn list_children(&self, folder_id: &str) -> Result<ChildIter, SyncError>;

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<String, SyncError>;

    /// Upload `local_path`'s contents as `name` under `parent_id`. When
    /// `existing_file_id` is `Some`, this is a new revision of that file
    /// rather than a fresh upload.
    async fn upload_file(
        &self,
        parent_id: &str,
        name: &str,
        existing_file_id: Option<&str>,
        local_path: &Path,
    ) -> Result<String, SyncError>;

    async fn trash(&self, node_id: &str) -> Result<(), SyncError>;

    async fn delete(&self, node_id: &str) -> Result<(), SyncError>;

    async fn move_node(&self, node_id: &str, new_parent_id: &str) -> Result<(), SyncError>;

    async fn rename(&self, node_id: &str, new_name: &str) -> Result<(), SyncError>;
}

/// Placeholder [`DriveClient`] for a daemon that hasn't been wired to a
/// real backend yet. Every call fails with [`dsync_core::ErrorKind::ServiceUnavailable`]
/// so the executor's normal retry path handles it rather than the daemon
/// crashing at startup — the real backend (credential storage, the actual
/// encrypted-object-store wire protocol) is out of scope here (`spec.md`
/// §1's Out of scope list) and is the one piece of the system a deployment
/// must supply itself.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredDriveClient;

#[async_trait]
impl DriveClient for UnconfiguredDriveClient {
    fn root_id(&self) -> &str {
        ""
    }

    async fn list_children(&self, _folder_id: &str) -> Result<ChildIter, SyncError> {
        Err(Self::unconfigured())
    }

    async fn create_folder(&self, _parent_id: &str, _name: &str) -> Result<String, SyncError> {
        Err(Self::unconfigured())
    }

    async fn upload_file(
        &self,
        _parent_id: &str,
        _name: &str,
        _existing_file_id: Option<&str>,
        _local_path: &Path,
    ) -> Result<String, SyncError> {
        Err(Self::unconfigured())
    }

    async fn trash(&self, _node_id: &str) -> Result<(), SyncError> {
        Err(Self::unconfigured())
    }

    async fn delete(&self, _node_id: &str) -> Result<(), SyncError> {
        Err(Self::unconfigured())
    }

    async fn move_node(&self, _node_id: &str, _new_parent_id: &str) -> Result<(), SyncError> {
        Err(Self::unconfigured())
    }

    async fn rename(&self, _node_id: &str, _new_name: &str) -> Result<(), SyncError> {
        Err(Self::unconfigured())
    }
}

impl UnconfiguredDriveClient {
    fn unconfigured() -> SyncError {
        SyncError::service_unavailable("no drive client backend configured")
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use dsync_core::{ErrorKind, SyncError};
    use parking_lot::Mutex;

    use super::{ChildIter, DriveClient, DriveNode};

    #[derive(Debug, Clone)]
    struct FakeNode {
        node: DriveNode,
        parent_id: String,
        content: Vec<u8>,
    }

    /// A child that fails to decode (`spec.md` §7 `DecryptionFailure`),
    /// injected by a test via [`FakeDriveClient::inject_degraded_child`].
    #[derive(Debug, Clone)]
    struct DegradedChild {
        parent_id: String,
        message: String,
    }

    struct FakeState {
        nodes: HashMap<String, FakeNode>,
        degraded: Vec<DegradedChild>,
        next_id: AtomicU64,
    }

    /// In-memory [`DriveClient`] honoring the full-iteration rule by
    /// construction: [`FakeDriveClient::list_children`] always returns the
    /// complete child set, there is no early-exit path to get wrong.
    #[derive(Clone)]
    pub struct FakeDriveClient {
        state: Arc<Mutex<FakeState>>,
        root_id: String,
    }

    impl Default for FakeDriveClient {
        fn default() -> Self {
            let root_id = "root".to_string();
            let mut nodes = HashMap::new();
            nodes.insert(
                root_id.clone(),
                FakeNode {
                    node: DriveNode { id: root_id.clone(), name: String::new(), is_folder: true },
                    parent_id: String::new(),
                    content: Vec::new(),
                },
            );
            Self {
                state: Arc::new(Mutex::new(FakeState { nodes, degraded: Vec::new(), next_id: AtomicU64::new(1) })),
                root_id,
            }
        }
    }

    impl FakeDriveClient {
        pub fn new() -> Self {
            Self::default()
        }

        fn alloc_id(&self, state: &FakeState) -> String {
            format!("n{}", state.next_id.fetch_add(1, Ordering::SeqCst))
        }

        /// Test helper: contents most recently uploaded for a file id.
        pub fn file_contents(&self, node_id: &str) -> Option<Vec<u8>> {
            self.state.lock().nodes.get(node_id).map(|n| n.content.clone())
        }

        pub fn node(&self, node_id: &str) -> Option<DriveNode> {
            self.state.lock().nodes.get(node_id).map(|n| n.node.clone())
        }

        /// Test helper: make `folder_id`'s next listing include one entry
        /// that fails to decode, alongside its real children.
        pub fn inject_degraded_child(&self, folder_id: &str, message: &str) {
            self.state
                .lock()
                .degraded
                .push(DegradedChild { parent_id: folder_id.to_string(), message: message.to_string() });
        }
    }

    #[async_trait]
    impl DriveClient for FakeDriveClient {
        fn root_id(&self) -> &str {
            &self.root_id
        }

        async fn list_children(&self, folder_id: &str) -> Result<ChildIter, SyncError> {
            let state = self.state.lock();
            let mut children: Vec<Result<DriveNode, SyncError>> = state
                .nodes
                .values()
                .filter(|n| n.parent_id == folder_id)
                .map(|n| Ok(n.node.clone()))
                .collect();
            children.extend(
                state
                    .degraded
                    .iter()
                    .filter(|d| d.parent_id == folder_id)
                    .map(|d| Err(SyncError::new(ErrorKind::DecryptionFailure, d.message.clone()))),
            );
            Ok(Box::new(children.into_iter()))
        }

        async fn create_folder(&self, parent_id: &str, name: &str) -> Result<String, SyncError> {
            let mut state = self.state.lock();
            let id = self.alloc_id(&state);
            state.nodes.insert(
                id.clone(),
                FakeNode {
                    node: DriveNode { id: id.clone(), name: name.to_string(), is_folder: true },
                    parent_id: parent_id.to_string(),
                    content: Vec::new(),
                },
            );
            Ok(id)
        }

        async fn upload_file(
            &self,
            parent_id: &str,
            name: &str,
            existing_file_id: Option<&str>,
            local_path: &Path,
        ) -> Result<String, SyncError> {
            let content = std::fs::read(local_path)
                .map_err(|e| SyncError::local_io(format!("reading {local_path:?}: {e}")))?;
            let mut state = self.state.lock();
            let id = existing_file_id.map(str::to_string).unwrap_or_else(|| self.alloc_id(&state));
            state.nodes.insert(
                id.clone(),
                FakeNode {
                    node: DriveNode { id: id.clone(), name: name.to_string(), is_folder: false },
                    parent_id: parent_id.to_string(),
                    content,
                },
            );
            Ok(id)
        }

        async fn trash(&self, node_id: &str) -> Result<(), SyncError> {
            self.delete(node_id).await
        }

        async fn delete(&self, node_id: &str) -> Result<(), SyncError> {
            let mut state = self.state.lock();
            if state.nodes.remove(node_id).is_none() {
                return Err(SyncError::not_found(format!("{node_id} not found")));
            }
            Ok(())
        }

        async fn move_node(&self, node_id: &str, new_parent_id: &str) -> Result<(), SyncError> {
            let mut state = self.state.lock();
            let node = state
                .nodes
                .get_mut(node_id)
                .ok_or_else(|| SyncError::not_found(format!("{node_id} not found")))?;
            node.parent_id = new_parent_id.to_string();
            Ok(())
        }

        async fn rename(&self, node_id: &str, new_name: &str) -> Result<(), SyncError> {
            let mut state = self.state.lock();
            let node = state
                .nodes
                .get_mut(node_id)
                .ok_or_else(|| SyncError::not_found(format!("{node_id} not found")))?;
            node.node.name = new_name.to_string();
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDriveClient;

#[cfg(test)]
#[path = "drive_tests.rs"]
mod tests;
