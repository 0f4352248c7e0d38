// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dsync`: a thin client over the daemon's shared SQLite store. No RPC —
//! every subcommand but `daemon start` just opens `state.db` directly and
//! reads or writes rows, since the store file is the one resource shared
//! across sibling processes (`spec.md` §5).

mod color;
mod output;

use std::process::Command;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dsync_core::SignalName;
use dsync_daemon::paths;
use dsync_storage::Store;

use output::{print_counts, print_jobs, OutputFormat};

#[derive(Parser)]
#[command(name = "dsync", about = "Control and inspect the drive-sync daemon", styles = color::styles())]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for read-only commands.
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Pause sync: the executor stops dispatching jobs until resumed.
    Pause,
    /// Resume sync after a pause.
    Resume,
    /// Request a graceful shutdown of the running daemon.
    Stop,
    /// Ask the dashboard collaborator to refresh (no-op without one).
    Refresh,
    /// Print job counts by status.
    Status,
    /// List jobs.
    Jobs {
        /// List BLOCKED jobs.
        #[arg(long, conflicts_with = "recent")]
        blocked: bool,
        /// List the most recently SYNCED jobs.
        #[arg(long, conflicts_with = "blocked")]
        recent: bool,
        /// Max rows for `--recent`.
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Manage the daemon process itself.
    Daemon {
        #[command(subcommand)]
        command: DaemonCommands,
    },
}

#[derive(Subcommand)]
enum DaemonCommands {
    /// Start `dsyncd`.
    Start {
        /// Run attached to this terminal instead of detaching.
        #[arg(long)]
        foreground: bool,
    },
}

fn open_store() -> anyhow::Result<Store> {
    paths::ensure_dirs().context("creating state/config directories")?;
    let path = paths::state_db_path();
    Store::open(&path).with_context(|| format!("opening state database at {}", path.display()))
}

fn send(signal: SignalName) -> anyhow::Result<()> {
    let store = open_store()?;
    store.send_signal(signal).with_context(|| format!("sending {signal} signal"))?;
    println!("sent {signal}");
    Ok(())
}

fn status(format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store()?;
    let counts = store.get_counts().context("reading job counts")?;
    print_counts(format, &counts)
}

fn jobs(format: OutputFormat, blocked: bool, recent: bool, limit: u32) -> anyhow::Result<()> {
    let store = open_store()?;
    if blocked {
        let rows = store.list_blocked().context("listing blocked jobs")?;
        print_jobs(format, &rows, "blocked")
    } else if recent {
        let rows = store.list_recent_synced(limit).context("listing recently synced jobs")?;
        print_jobs(format, &rows, "recently synced")
    } else {
        anyhow::bail!("specify either --blocked or --recent");
    }
}

fn daemon_start(foreground: bool) -> anyhow::Result<()> {
    let exe = std::env::current_exe().context("locating dsync binary")?;
    let dsyncd = exe
        .parent()
        .map(|dir| dir.join("dsyncd"))
        .filter(|p| p.exists())
        .unwrap_or_else(|| "dsyncd".into());

    let mut command = Command::new(dsyncd);
    if foreground {
        command.arg("--foreground");
        let status = command.status().context("running dsyncd in the foreground")?;
        anyhow::ensure!(status.success(), "dsyncd exited with {status}");
    } else {
        command.spawn().context("spawning dsyncd in the background")?;
        println!("dsyncd started");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Pause => send(SignalName::PauseSync),
        Commands::Resume => send(SignalName::ResumeSync),
        Commands::Stop => send(SignalName::Stop),
        Commands::Refresh => send(SignalName::RefreshDashboard),
        Commands::Status => status(cli.format),
        Commands::Jobs { blocked, recent, limit } => jobs(cli.format, blocked, recent, limit),
        Commands::Daemon { command: DaemonCommands::Start { foreground } } => daemon_start(foreground),
    }
}
