// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::jobs::JobInput;
use dsync_core::EventType;

#[test]
fn open_in_memory_creates_schema() {
    let store = Store::open_in_memory().unwrap();
    assert_eq!(store.get_clock("/watch").unwrap(), None);
    assert_eq!(store.get_counts().unwrap(), crate::jobs::JobCounts::default());
}

#[test]
fn recovers_processing_jobs_to_pending_on_open() {
    let store = Store::open_in_memory().unwrap();
    let id = store
        .enqueue_job(JobInput {
            event_type: EventType::Update,
            local_path: "/watch/a.txt",
            remote_path: "a.txt",
            old_remote_path: None,
        })
        .unwrap();
    let claimed = store.get_next_pending_job().unwrap().unwrap();
    assert_eq!(claimed.id, id);
    assert_eq!(claimed.status, dsync_core::JobStatus::Processing);

    // Simulate a crash: reopen the same connection's worth of state by
    // calling the crash-recovery path directly, the way `open` would on
    // the next process start.
    store.recover_crashed_jobs().unwrap();
    let recovered = store.get_next_pending_job().unwrap().unwrap();
    assert_eq!(recovered.id, id);
    assert_eq!(recovered.status, dsync_core::JobStatus::Processing);
}
