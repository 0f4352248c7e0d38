// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide flags visible to sibling processes through the shared
//! store (`spec.md` §3, §4.2).

use serde::{Deserialize, Serialize};

/// A named piece of process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagName {
    /// Set while the daemon is alive; variant carries its PID.
    Running,
    /// Set by the control plane while sync is paused.
    Paused,
    /// Set once the host service-manager integration has installed the
    /// daemon as a service.
    ServiceInstalled,
    /// Records whether the change-source service was spawned by this
    /// daemon or was already running when it connected.
    WatchmanRunning,
}

impl FlagName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagName::Running => "RUNNING",
            FlagName::Paused => "PAUSED",
            FlagName::ServiceInstalled => "SERVICE_INSTALLED",
            FlagName::WatchmanRunning => "WATCHMAN_RUNNING",
        }
    }
}

/// The optional small enumerated variant a flag can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FlagVariant {
    /// PID of the process that set the flag (used by `RUNNING`).
    Pid(u32),
    /// Whether the change-source service was spawned by us or pre-existing.
    Lifecycle(WatchmanLifecycle),
}

/// Whether the change-source service was started by this daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchmanLifecycle {
    Spawned,
    Existing,
}

impl FlagVariant {
    pub fn as_pid(&self) -> Option<u32> {
        match self {
            FlagVariant::Pid(pid) => Some(*pid),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "flag_tests.rs"]
mod tests;
