// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn no_existing_job_inserts() {
    assert_eq!(coalesce(None, EventType::Update), Coalesced::Insert);
    assert_eq!(coalesce(None, EventType::Delete), Coalesced::Insert);
}

#[test]
fn delete_then_create_or_update_becomes_update() {
    assert_eq!(
        coalesce(Some(EventType::Delete), EventType::Create),
        Coalesced::UpdateInPlace(EventType::Update)
    );
    assert_eq!(
        coalesce(Some(EventType::Delete), EventType::Update),
        Coalesced::UpdateInPlace(EventType::Update)
    );
}

#[test]
fn delete_then_delete_stays_delete() {
    assert_eq!(
        coalesce(Some(EventType::Delete), EventType::Delete),
        Coalesced::UpdateInPlace(EventType::Delete)
    );
}

#[test]
fn create_or_update_then_delete_becomes_delete() {
    assert_eq!(
        coalesce(Some(EventType::Create), EventType::Delete),
        Coalesced::UpdateInPlace(EventType::Delete)
    );
    assert_eq!(
        coalesce(Some(EventType::Update), EventType::Delete),
        Coalesced::UpdateInPlace(EventType::Delete)
    );
}

#[test]
fn create_or_update_then_create_or_update_coalesces_to_update() {
    assert_eq!(
        coalesce(Some(EventType::Create), EventType::Update),
        Coalesced::UpdateInPlace(EventType::Update)
    );
    assert_eq!(
        coalesce(Some(EventType::Update), EventType::Create),
        Coalesced::UpdateInPlace(EventType::Update)
    );
    assert_eq!(
        coalesce(Some(EventType::Update), EventType::Update),
        Coalesced::UpdateInPlace(EventType::Update)
    );
}

#[test]
fn enqueueing_same_update_twice_results_in_one_pending_row() {
    // Simulates: enqueue(UPDATE) when nothing pending -> Insert,
    // then enqueue(UPDATE) again while that row is still PENDING -> coalesce
    // in place rather than a second row.
    let first = coalesce(None, EventType::Update);
    assert_eq!(first, Coalesced::Insert);
    let second = coalesce(Some(EventType::Update), EventType::Update);
    assert_eq!(second, Coalesced::UpdateInPlace(EventType::Update));
}

#[test]
#[should_panic(expected = "MOVE never coalesces")]
fn move_incoming_panics_in_debug() {
    let _ = coalesce(Some(EventType::Update), EventType::Move);
}

#[test]
fn synced_and_blocked_are_terminal() {
    let mut job = SyncJob {
        id: 1,
        event_type: EventType::Update,
        local_path: "/a".into(),
        remote_path: "a".into(),
        old_remote_path: None,
        status: JobStatus::Synced,
        retry_at: 0,
        n_retries: 0,
        last_error: None,
        created_at: 0,
    };
    assert!(job.is_terminal());
    job.status = JobStatus::Blocked;
    assert!(job.is_terminal());
    job.status = JobStatus::Pending;
    assert!(!job.is_terminal());
    job.status = JobStatus::Processing;
    assert!(!job.is_terminal());
}

#[test]
fn event_type_display_matches_schema() {
    assert_eq!(EventType::Create.to_string(), "CREATE");
    assert_eq!(EventType::Update.to_string(), "UPDATE");
    assert_eq!(EventType::Delete.to_string(), "DELETE");
    assert_eq!(EventType::Move.to_string(), "MOVE");
}
