// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frames the change-source service sends back (`spec.md` §4.6): either a
//! reply to a specific request, or a unilateral subscription push.

use serde::{Deserialize, Serialize};

use crate::types::WireFileRecord;

/// A direct reply to a [`crate::request::Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Version { version: String, capabilities: Vec<String> },
    Watch { watch: String, #[serde(default)] relative_path: Option<String> },
    QueryResult { clock: String, files: Vec<WireFileRecord>, is_fresh_instance: bool },
    SubscribeAck { subscribe: String },
    UnsubscribeAck { unsubscribe: String },
    Pid { pid: u32 },
    Error { error: String },
}

/// Any frame read off the socket: a reply to the in-flight request, or a
/// subscription event pushed without one. The adapter's read loop must
/// check which shape it got before matching further — a subscription push
/// for a name it no longer tracks (already unsubscribed, or never known)
/// is logged and discarded (`spec.md` §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Incoming {
    Subscription(SubscriptionEvent),
    Reply(Response),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionEvent {
    pub subscription: String,
    pub root: String,
    pub clock: String,
    pub files: Vec<WireFileRecord>,
    pub is_fresh_instance: bool,
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
