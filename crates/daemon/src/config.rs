// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: the set of local directories to mirror and the
//! remote-root prefix they mirror under (`spec.md` §6).

use std::path::{Path, PathBuf};

use dsync_core::WatchRoot;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("canonicalizing sync_dirs[{index}] ({path:?}): {source}")]
    WatchRoot { index: usize, path: PathBuf, #[source] source: std::io::Error },
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncDir {
    pub source_path: PathBuf,
}

/// `{sync_dirs: [{source_path}], remote_root: string}` (`spec.md` §6).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sync_dirs: Vec<SyncDir>,
    #[serde(default)]
    pub remote_root: String,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_str(&raw)
    }

    pub fn from_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Canonicalize every configured `source_path` into a [`WatchRoot`],
    /// failing with the offending index if a directory doesn't exist.
    pub fn watch_roots(&self) -> Result<Vec<WatchRoot>, ConfigError> {
        self.sync_dirs
            .iter()
            .enumerate()
            .map(|(index, dir)| {
                WatchRoot::canonicalize(&dir.source_path).map_err(|source| ConfigError::WatchRoot {
                    index,
                    path: dir.source_path.clone(),
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
