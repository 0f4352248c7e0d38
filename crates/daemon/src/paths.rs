// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem locations (`spec.md` §6): state dir, config dir, and the
//! well-known files under each, resolved through `$XDG_STATE_HOME` /
//! `$XDG_CONFIG_HOME` with `dirs` crate fallbacks when unset.

use std::path::PathBuf;

const APP_DIR: &str = "drive-sync";

fn xdg_dir(env_var: &str, fallback: impl FnOnce() -> Option<PathBuf>) -> PathBuf {
    std::env::var_os(env_var)
        .map(PathBuf::from)
        .or_else(fallback)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// `$XDG_STATE_HOME/drive-sync`, falling back to `dirs::state_dir()`.
pub fn state_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", dirs::state_dir)
}

/// `$XDG_CONFIG_HOME/drive-sync`, falling back to `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", dirs::config_dir)
}

/// The embedded store file (`spec.md` §6: "A file-based relational
/// database at `<state-dir>/state.db`").
pub fn state_db_path() -> PathBuf {
    state_dir().join("state.db")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn log_path() -> PathBuf {
    state_dir().join("daemon.log")
}

/// Socket for the external change-source service (`spec.md` §1: "treated
/// as an external daemon that publishes events on a long-lived
/// connection"). Not something this daemon spawns or configures; the
/// path is a deployment-level convention, overridable via
/// `DRIVE_SYNC_WATCH_SOCK` for environments that run the service
/// somewhere nonstandard.
pub fn change_source_socket_path() -> PathBuf {
    if let Some(path) = std::env::var_os("DRIVE_SYNC_WATCH_SOCK") {
        return PathBuf::from(path);
    }
    dirs::runtime_dir().unwrap_or_else(std::env::temp_dir).join("drive-sync-watch.sock")
}

/// Ensure the state and config directories exist, creating them (and any
/// missing parents) if needed. Called once at startup before anything
/// else touches the filesystem.
pub fn ensure_dirs() -> std::io::Result<()> {
    std::fs::create_dir_all(state_dir())?;
    std::fs::create_dir_all(config_dir())?;
    Ok(())
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
