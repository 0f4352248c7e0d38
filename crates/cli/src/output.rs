// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering for `dsync`'s read-only commands: plain text by default,
//! `--format json` for scripting.

use clap::ValueEnum;
use dsync_core::SyncJob;
use dsync_storage::JobCounts;

use crate::color::{context, header, literal, muted};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_counts(format: OutputFormat, counts: &JobCounts) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(counts)?);
        }
        OutputFormat::Text => {
            println!("{}", header("sync status"));
            println!("  pending:    {}", counts.pending);
            println!("  processing: {}", counts.processing);
            println!("  synced:     {}", counts.synced);
            println!("  blocked:    {}", counts.blocked);
        }
    }
    Ok(())
}

/// Render a list of jobs, either as a JSON array or one line of text per
/// job. `label` is only used by the text branch's empty-list message.
pub fn print_jobs(format: OutputFormat, jobs: &[SyncJob], label: &str) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(jobs)?);
        }
        OutputFormat::Text => {
            if jobs.is_empty() {
                println!("{}", muted(&format!("no {label} jobs")));
                return Ok(());
            }
            for job in jobs {
                let error = job.last_error.as_deref().unwrap_or("");
                println!(
                    "{:>6}  {:<6}  {:<8}  {} -> {}  {}",
                    job.id,
                    job.event_type,
                    job.status,
                    context(&job.local_path),
                    literal(&job.remote_path),
                    muted(error)
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
