// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dsync-engine: the sync engine proper — path resolution (D), remote
//! mutations (E), the event normalizer + debouncer (G), and the executor
//! loop (H) that ties the job store (`dsync-storage`) to the drive client
//! (`dsync-adapters`).

pub mod debouncer;
pub mod executor;
pub mod normalizer;
pub mod remote_ops;
pub mod resolver;

pub use debouncer::{Debouncer, PendingClock, DEBOUNCE_MS};
pub use executor::{Executor, POLL_INTERVAL};
pub use normalizer::{normalize_batch, NormalizedChange};
pub use remote_ops::{create_folder_path, delete_path, move_path, upload_file};
pub use resolver::PathResolver;
