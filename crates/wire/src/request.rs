// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests F sends to the change-source service (`spec.md` §4.6).

use serde::{Deserialize, Serialize};

use crate::types::QueryExpression;

/// A request frame sent over the change-source socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum Request {
    /// Initial handshake, sent once per connection.
    Version,

    /// Register a directory as a watch root with the service.
    WatchProject { path: String },

    /// One-shot query against a previously registered root.
    Query {
        root: String,
        #[serde(default)]
        since: Option<String>,
        #[serde(default)]
        relative_root: Option<String>,
        fields: Vec<String>,
        expression: QueryExpression,
    },

    /// Register a named subscription; results arrive as unilateral
    /// [`crate::response::Incoming::Subscription`] frames until
    /// [`Request::Unsubscribe`].
    Subscribe {
        root: String,
        name: String,
        #[serde(default)]
        since: Option<String>,
        #[serde(default)]
        relative_root: Option<String>,
        fields: Vec<String>,
        expression: QueryExpression,
    },

    Unsubscribe { root: String, name: String },

    /// Ask the service to terminate. Only sent for a SPAWNED instance.
    ShutdownServer,

    /// Fetch the service's own process id, for liveness tracking.
    GetPid,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
