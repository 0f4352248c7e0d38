// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for the change-source socket (F, `spec.md` §4.6).
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod types;
mod wire;

pub use request::Request;
pub use response::{Incoming, Response, SubscriptionEvent};
pub use types::{QueryExpression, WireFileKind, WireFileRecord, QUERY_FIELDS};
pub use wire::{
    decode, encode, read_message, read_request, write_message, write_response, ProtocolError,
    MAX_FRAME_BYTES,
};
