// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DDL for the embedded store (`spec.md` §6).
//!
//! `clocks`, `signals`, and `sync_jobs` are the three tables a sibling
//! dashboard process reads directly; `flags` is an internal fourth table
//! backing the process-wide flag bus (`spec.md` §4.2), not named in §6's
//! external schema because nothing outside the daemon needs to read it
//! directly today.

pub const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS clocks (
        directory TEXT PRIMARY KEY,
        clock     TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS signals (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        signal     TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sync_jobs (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        event_type       TEXT NOT NULL,
        local_path       TEXT NOT NULL,
        remote_path      TEXT NOT NULL,
        old_remote_path  TEXT,
        status           TEXT NOT NULL DEFAULT 'PENDING',
        retry_at         INTEGER NOT NULL,
        n_retries        INTEGER NOT NULL DEFAULT 0,
        last_error       TEXT,
        created_at       INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_sync_jobs_status_retry_at
        ON sync_jobs (status, retry_at)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS flags (
        name    TEXT PRIMARY KEY,
        variant TEXT
    )
    "#,
];
