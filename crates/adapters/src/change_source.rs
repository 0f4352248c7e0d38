// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The change-source adapter's socket client (F, `spec.md` §4.6): connects
//! to the external file-change service over a long-lived Unix socket and
//! speaks `dsync-wire`'s framed-JSON protocol.

use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use dsync_core::SyncError;
use dsync_wire::{Incoming, Request, Response, SubscriptionEvent, WireFileRecord};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::UnixStream;

/// Result of a one-shot query or the initial read of a subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub clock: String,
    pub files: Vec<WireFileRecord>,
    pub is_fresh_instance: bool,
}

/// Capability set F needs from the change-source connection.
#[async_trait]
pub trait ChangeSourceClient: Send + 'static {
    async fn watch_project(&mut self, path: &str) -> Result<String, SyncError>;

    async fn query(&mut self, root: &str, since: Option<String>) -> Result<QueryResult, SyncError>;

    async fn subscribe(
        &mut self,
        root: &str,
        name: &str,
        since: Option<String>,
    ) -> Result<(), SyncError>;

    async fn unsubscribe(&mut self, root: &str, name: &str) -> Result<(), SyncError>;

    /// Block until the next unilateral subscription push arrives. Events
    /// for a subscription name this client no longer tracks are logged and
    /// discarded by the caller, per `spec.md` §4.6.
    async fn next_event(&mut self) -> Result<SubscriptionEvent, SyncError>;

    async fn get_pid(&mut self) -> Result<u32, SyncError>;

    async fn shutdown_server(&mut self) -> Result<(), SyncError>;
}

/// Real client over a Unix domain socket.
pub struct SocketChangeSourceClient<S = UnixStream> {
    stream: BufReader<S>,
    /// Subscription pushes observed while waiting on a request's reply,
    /// queued so [`Self::next_event`] can drain them in order.
    pending_events: VecDeque<SubscriptionEvent>,
}

impl SocketChangeSourceClient<UnixStream> {
    pub async fn connect(socket_path: &Path) -> Result<Self, SyncError> {
        let stream = UnixStream::connect(socket_path)
            .await
            .map_err(|e| SyncError::service_unavailable(format!("connecting to {socket_path:?}: {e}")))?;
        Ok(Self::from_stream(stream))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin + Send + 'static> SocketChangeSourceClient<S> {
    pub fn from_stream(stream: S) -> Self {
        Self { stream: BufReader::new(stream), pending_events: VecDeque::new() }
    }

    async fn send(&mut self, request: &Request) -> Result<(), SyncError> {
        let payload = dsync_wire::encode(request)
            .map_err(|e| SyncError::service_unavailable(format!("encoding request: {e}")))?;
        dsync_wire::write_message(&mut self.stream, &payload)
            .await
            .map_err(|e| SyncError::service_unavailable(format!("writing request: {e}")))
    }

    /// Read frames until a [`Response`] arrives, queuing any subscription
    /// pushes seen along the way.
    async fn recv_response(&mut self) -> Result<Response, SyncError> {
        loop {
            let bytes = dsync_wire::read_message(&mut self.stream)
                .await
                .map_err(|e| SyncError::service_unavailable(format!("reading response: {e}")))?;
            let incoming: Incoming = dsync_wire::decode(&bytes)
                .map_err(|e| SyncError::service_unavailable(format!("decoding response: {e}")))?;
            match incoming {
                Incoming::Reply(Response::Error { error }) => {
                    return Err(SyncError::service_unavailable(error));
                }
                Incoming::Reply(response) => return Ok(response),
                Incoming::Subscription(event) => self.pending_events.push_back(event),
            }
        }
    }
}

#[async_trait]
impl<S: AsyncRead + AsyncWrite + Unpin + Send + 'static> ChangeSourceClient for SocketChangeSourceClient<S> {
    async fn watch_project(&mut self, path: &str) -> Result<String, SyncError> {
        self.send(&Request::WatchProject { path: path.to_string() }).await?;
        match self.recv_response().await? {
            Response::Watch { watch, .. } => Ok(watch),
            other => Err(unexpected_response("Watch", &other)),
        }
    }

    async fn query(&mut self, root: &str, since: Option<String>) -> Result<QueryResult, SyncError> {
        self.send(&Request::Query {
            root: root.to_string(),
            since,
            relative_root: None,
            fields: dsync_wire::QUERY_FIELDS.iter().map(|s| s.to_string()).collect(),
            expression: dsync_wire::QueryExpression::AnyFileOrDir,
        })
        .await?;
        match self.recv_response().await? {
            Response::QueryResult { clock, files, is_fresh_instance } => {
                Ok(QueryResult { clock, files, is_fresh_instance })
            }
            other => Err(unexpected_response("QueryResult", &other)),
        }
    }

    async fn subscribe(
        &mut self,
        root: &str,
        name: &str,
        since: Option<String>,
    ) -> Result<(), SyncError> {
        self.send(&Request::Subscribe {
            root: root.to_string(),
            name: name.to_string(),
            since,
            relative_root: None,
            fields: dsync_wire::QUERY_FIELDS.iter().map(|s| s.to_string()).collect(),
            expression: dsync_wire::QueryExpression::AnyFileOrDir,
        })
        .await?;
        match self.recv_response().await? {
            Response::SubscribeAck { .. } => Ok(()),
            other => Err(unexpected_response("SubscribeAck", &other)),
        }
    }

    async fn unsubscribe(&mut self, root: &str, name: &str) -> Result<(), SyncError> {
        self.send(&Request::Unsubscribe { root: root.to_string(), name: name.to_string() }).await?;
        match self.recv_response().await? {
            Response::UnsubscribeAck { .. } => Ok(()),
            other => Err(unexpected_response("UnsubscribeAck", &other)),
        }
    }

    async fn next_event(&mut self) -> Result<SubscriptionEvent, SyncError> {
        if let Some(event) = self.pending_events.pop_front() {
            return Ok(event);
        }
        loop {
            let bytes = dsync_wire::read_message(&mut self.stream)
                .await
                .map_err(|e| SyncError::service_unavailable(format!("reading event: {e}")))?;
            let incoming: Incoming = dsync_wire::decode(&bytes)
                .map_err(|e| SyncError::service_unavailable(format!("decoding event: {e}")))?;
            if let Incoming::Subscription(event) = incoming {
                return Ok(event);
            }
            // A reply frame arriving here means a request/response pair is
            // desynchronized; log and keep waiting rather than erroring the
            // whole connection out from under a long-lived subscription.
            tracing::warn!("discarding unexpected reply frame while awaiting subscription event");
        }
    }

    async fn get_pid(&mut self) -> Result<u32, SyncError> {
        self.send(&Request::GetPid).await?;
        match self.recv_response().await? {
            Response::Pid { pid } => Ok(pid),
            other => Err(unexpected_response("Pid", &other)),
        }
    }

    async fn shutdown_server(&mut self) -> Result<(), SyncError> {
        self.send(&Request::ShutdownServer).await
    }
}

fn unexpected_response(expected: &str, got: &Response) -> SyncError {
    SyncError::service_unavailable(format!("expected {expected} response, got {got:?}"))
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use dsync_core::SyncError;
    use dsync_wire::{SubscriptionEvent, WireFileRecord};
    use parking_lot::Mutex;

    use super::{ChangeSourceClient, QueryResult};

    #[derive(Default)]
    struct FakeState {
        queries: Vec<(String, Option<String>)>,
        subscriptions: Vec<(String, String)>,
        events: VecDeque<SubscriptionEvent>,
        next_query_result: Option<QueryResult>,
        pid: u32,
    }

    /// Scriptable [`ChangeSourceClient`] for tests: pre-load query results
    /// and subscription events, then inspect what the adapter did.
    #[derive(Clone, Default)]
    pub struct FakeChangeSourceClient {
        state: Arc<Mutex<FakeState>>,
    }

    impl FakeChangeSourceClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_query_result(&self, clock: String, files: Vec<WireFileRecord>, is_fresh_instance: bool) {
            self.state.lock().next_query_result = Some(QueryResult { clock, files, is_fresh_instance });
        }

        pub fn push_event(&self, event: SubscriptionEvent) {
            self.state.lock().events.push_back(event);
        }

        pub fn set_pid(&self, pid: u32) {
            self.state.lock().pid = pid;
        }

        pub fn queries(&self) -> Vec<(String, Option<String>)> {
            self.state.lock().queries.clone()
        }

        pub fn subscriptions(&self) -> Vec<(String, String)> {
            self.state.lock().subscriptions.clone()
        }
    }

    #[async_trait]
    impl ChangeSourceClient for FakeChangeSourceClient {
        async fn watch_project(&mut self, path: &str) -> Result<String, SyncError> {
            Ok(path.to_string())
        }

        async fn query(&mut self, root: &str, since: Option<String>) -> Result<QueryResult, SyncError> {
            let mut state = self.state.lock();
            state.queries.push((root.to_string(), since));
            state.next_query_result.clone().ok_or_else(|| {
                SyncError::service_unavailable("FakeChangeSourceClient: no query result scripted")
            })
        }

        async fn subscribe(
            &mut self,
            root: &str,
            name: &str,
            _since: Option<String>,
        ) -> Result<(), SyncError> {
            self.state.lock().subscriptions.push((root.to_string(), name.to_string()));
            Ok(())
        }

        async fn unsubscribe(&mut self, root: &str, name: &str) -> Result<(), SyncError> {
            self.state.lock().subscriptions.retain(|(r, n)| !(r == root && n == name));
            Ok(())
        }

        async fn next_event(&mut self) -> Result<SubscriptionEvent, SyncError> {
            self.state
                .lock()
                .events
                .pop_front()
                .ok_or_else(|| SyncError::service_unavailable("FakeChangeSourceClient: no events queued"))
        }

        async fn get_pid(&mut self) -> Result<u32, SyncError> {
            Ok(self.state.lock().pid)
        }

        async fn shutdown_server(&mut self) -> Result<(), SyncError> {
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeChangeSourceClient;

#[cfg(test)]
#[path = "change_source_tests.rs"]
mod tests;
