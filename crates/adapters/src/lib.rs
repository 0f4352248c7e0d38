// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dsync-adapters: the capability traits the engine (D, E, F) programs
//! against, plus their fakes. Each adapter's real and fake implementations
//! live side by side in one file, the real impl behind the trait and the
//! fake behind `#[cfg(any(test, feature = "test-support"))]`.

mod change_source;
mod drive;

pub use change_source::{ChangeSourceClient, QueryResult, SocketChangeSourceClient};
pub use drive::{ChildIter, ChildResult, DriveClient, DriveNode, UnconfiguredDriveClient};

#[cfg(any(test, feature = "test-support"))]
pub use change_source::FakeChangeSourceClient;
#[cfg(any(test, feature = "test-support"))]
pub use drive::FakeDriveClient;
