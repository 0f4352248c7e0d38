// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dsync-storage: the embedded store backing components A (clock store),
//! B (flag/signal bus), and C (job store) of `spec.md` §4. A single
//! `rusqlite::Connection`, held behind one mutex, backs all three so the
//! daemon's tasks share one consistent view without a separate IPC layer —
//! and so a sibling dashboard process can open the same file and run plain
//! SQL against `clocks`, `signals`, and `sync_jobs` with no protocol of its
//! own to speak.

mod clocks;
mod error;
mod flags;
mod jobs;
mod schema;
mod signals;
mod store;

pub use error::StoreError;
pub use jobs::{JobCounts, JobInput};
pub use store::Store;
