//! Scripted transport for testing.
//!
//! Provides a configurable mock implementation of the `Transport` trait so
//! front ends and tests can drive a conversation without an agent API.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Notify;

use crate::error::{TransportError, TransportResult};
use crate::transport::Transport;
use crate::types::{AgentReply, SessionId, TransferState};

/// Predefined outcome of one send-message exchange.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Successful reply
    Reply(AgentReply),
    /// Non-success HTTP status
    Status(u16),
}

impl ScriptedReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self::Reply(AgentReply::new(response, None))
    }

    pub fn with_state(response: impl Into<String>, state: TransferState) -> Self {
        Self::Reply(AgentReply::new(response, Some(state)))
    }

    pub fn status(code: u16) -> Self {
        Self::Status(code)
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedCall {
    pub method: String,
    pub session_id: Option<String>,
    pub message: Option<String>,
}

/// Scripted transport for testing.
///
/// Replies are consumed in order; once exhausted every send answers with an
/// empty reply. `hold` keeps the next exchange in flight until `release`.
#[derive(Clone)]
pub struct ScriptedTransport {
    /// Session id to issue, or `None` to fail session creation.
    session_id: Arc<RwLock<Option<SessionId>>>,
    /// Queued send-message outcomes.
    replies: Arc<RwLock<VecDeque<ScriptedReply>>>,
    /// Captured calls for verification.
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    held: Arc<AtomicBool>,
    gate: Arc<Notify>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    /// Create a transport that issues session id `mock-session`.
    pub fn new() -> Self {
        Self {
            session_id: Arc::new(RwLock::new(Some("mock-session".to_string()))),
            replies: Arc::new(RwLock::new(VecDeque::new())),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
            held: Arc::new(AtomicBool::new(false)),
            gate: Arc::new(Notify::new()),
        }
    }

    /// Set the session id to issue.
    pub fn with_session_id(self, id: impl Into<String>) -> Self {
        *self.session_id.write() = Some(id.into());
        self
    }

    /// Make session creation fail.
    pub fn fail_session(self) -> Self {
        *self.session_id.write() = None;
        self
    }

    /// Queue a reply for the next send.
    pub fn add_reply(self, reply: ScriptedReply) -> Self {
        self.replies.write().push_back(reply);
        self
    }

    /// Queue a reply on a shared handle.
    pub fn push_reply(&self, reply: ScriptedReply) {
        self.replies.write().push_back(reply);
    }

    /// Keep sends in flight until `release` is called.
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let a held send complete.
    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.gate.notify_one();
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Messages sent, in order.
    pub fn sent_messages(&self) -> Vec<String> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.method == "send_message")
            .filter_map(|c| c.message.clone())
            .collect()
    }

    fn record_call(&self, call: CapturedCall) {
        self.captured_calls.write().push(call);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn create_session(&self) -> TransportResult<SessionId> {
        self.record_call(CapturedCall {
            method: "create_session".to_string(),
            session_id: None,
            message: None,
        });

        let issued = self.session_id.read().clone();
        issued.ok_or_else(|| TransportError::Status {
            status: 503,
            body: "mock: session creation disabled".to_string(),
        })
    }

    async fn send_message(&self, session_id: &str, message: &str) -> TransportResult<AgentReply> {
        self.record_call(CapturedCall {
            method: "send_message".to_string(),
            session_id: Some(session_id.to_string()),
            message: Some(message.to_string()),
        });

        if self.held.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }

        let next = self.replies.write().pop_front();
        match next {
            Some(ScriptedReply::Reply(reply)) => Ok(reply),
            Some(ScriptedReply::Status(status)) => Err(TransportError::Status {
                status,
                body: String::new(),
            }),
            None => Ok(AgentReply::new("", None)),
        }
    }
}
