//! Chat client: session lifecycle and send orchestration.
//!
//! This module provides the main entry point for a conversation. A client
//! owns exactly one session, the conversation log, the transfer tracker and
//! the input buffer. Every mutation is announced on a broadcast channel so a
//! front end can re-render without polling.

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::{ChatError, ChatResult};
use crate::log::ConversationLog;
use crate::tracker::TransferTracker;
use crate::transport::Transport;
use crate::types::{
    InputMode, SessionId, SessionPhase, TransferState, Turn, CONNECT_FAILED, GREETING,
    SEND_FAILED,
};

/// Capacity of the change-notification channel
const EVENT_CAPACITY: usize = 256;

/// Change notification for subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A turn was added to the log
    TurnAppended(Turn),
    /// The transfer snapshot was replaced
    TransferStateReplaced(Option<TransferState>),
    /// A request started (`true`) or settled (`false`)
    BusyChanged(bool),
    /// The session lifecycle moved on
    PhaseChanged(SessionPhase),
}

/// Why a send did not go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Message was empty or whitespace only
    EmptyMessage,
    /// No session exists (not initialized, or creation failed)
    NoSession,
    /// Another exchange is still in flight
    Busy,
    /// The chosen option is not on offer
    NoSuchOption,
}

/// Result of a send attempt.
#[derive(Debug)]
pub enum SendOutcome {
    /// Nothing was sent
    Skipped(SkipReason),
    /// The agent replied; carries the input mode that now applies
    Delivered(InputMode),
    /// The exchange failed and an error turn was recorded
    Failed(ChatError),
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Read-only copy of everything a front end renders.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub session_id: Option<SessionId>,
    pub turns: Vec<Turn>,
    pub transfer_state: Option<TransferState>,
    pub input_mode: InputMode,
    pub busy: bool,
    pub input: String,
}

struct SessionInner {
    phase: SessionPhase,
    initializing: bool,
    session_id: Option<SessionId>,
    log: ConversationLog,
    tracker: TransferTracker,
    pending: bool,
    input: String,
}

/// Conversation client for a single agent session.
pub struct ChatClient<T: Transport> {
    transport: T,
    inner: Mutex<SessionInner>,
    events: broadcast::Sender<SessionEvent>,
}

/// Clears the pending flag when dropped, whatever path the send took.
///
/// A send abandoned before it settled still closes its exchange with an
/// error turn, so every recorded user turn is followed by exactly one reply.
struct PendingGuard<'a, T: Transport> {
    client: &'a ChatClient<T>,
    settled: bool,
}

impl<T: Transport> Drop for PendingGuard<'_, T> {
    fn drop(&mut self) {
        let abandoned = {
            let mut inner = self.client.inner.lock();
            inner.pending = false;
            if self.settled {
                None
            } else {
                let turn = Turn::error(SEND_FAILED);
                inner.log.append(turn.clone());
                Some(turn)
            }
        };

        if let Some(turn) = abandoned {
            warn!("message exchange abandoned before it settled");
            self.client.emit(SessionEvent::TurnAppended(turn));
        }
        self.client.emit(SessionEvent::BusyChanged(false));
    }
}

impl<T: Transport> ChatClient<T> {
    /// Create a client; no exchange happens until `initialize`.
    pub fn new(transport: T) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            transport,
            inner: Mutex::new(SessionInner {
                phase: SessionPhase::Starting,
                initializing: false,
                session_id: None,
                log: ConversationLog::new(),
                tracker: TransferTracker::new(),
                pending: false,
                input: String::new(),
            }),
            events,
        }
    }

    /// The transport in use.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Receive a notification for every subsequent mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Create the session. Runs at most once per client.
    ///
    /// On failure the error turn is recorded, the client enters
    /// `SessionPhase::Failed` for good, and the error is returned.
    pub async fn initialize(&self) -> ChatResult<SessionId> {
        {
            let mut inner = self.inner.lock();
            if inner.initializing || inner.phase != SessionPhase::Starting {
                return Err(ChatError::AlreadyInitialized);
            }
            inner.initializing = true;
        }

        let result = self.transport.create_session().await;

        let mut inner = self.inner.lock();
        inner.initializing = false;
        match result {
            Ok(session_id) => {
                info!(session_id = %session_id, "session created");
                inner.session_id = Some(session_id.clone());
                inner.phase = SessionPhase::Ready;
                let greeting = Turn::assistant(GREETING);
                inner.log.append(greeting.clone());
                self.emit(SessionEvent::PhaseChanged(SessionPhase::Ready));
                self.emit(SessionEvent::TurnAppended(greeting));
                Ok(session_id)
            }
            Err(e) => {
                warn!(error = %e, "failed to create session");
                inner.phase = SessionPhase::Failed;
                let turn = Turn::error(CONNECT_FAILED);
                inner.log.append(turn.clone());
                self.emit(SessionEvent::PhaseChanged(SessionPhase::Failed));
                self.emit(SessionEvent::TurnAppended(turn));
                Err(ChatError::SessionInit(e))
            }
        }
    }

    /// Send a message to the agent.
    ///
    /// The user turn is recorded before the exchange starts. Exactly one more
    /// turn (assistant or error) is recorded when it settles.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let (session_id, mut guard) = {
            let mut inner = self.inner.lock();

            if text.trim().is_empty() {
                return SendOutcome::Skipped(SkipReason::EmptyMessage);
            }
            let Some(session_id) = inner.session_id.clone() else {
                debug!("send skipped: no session");
                return SendOutcome::Skipped(SkipReason::NoSession);
            };
            if inner.pending {
                debug!("send skipped: request in flight");
                return SendOutcome::Skipped(SkipReason::Busy);
            }

            let turn = Turn::user(text);
            inner.log.append(turn.clone());
            inner.pending = true;
            inner.input.clear();
            self.emit(SessionEvent::TurnAppended(turn));
            self.emit(SessionEvent::BusyChanged(true));

            (
                session_id,
                PendingGuard {
                    client: self,
                    settled: false,
                },
            )
        };

        let result = self.transport.send_message(&session_id, text).await;

        let outcome = {
            let mut inner = self.inner.lock();
            guard.settled = true;
            match result {
                Ok(reply) => {
                    let turn = Turn::assistant(reply.response_text);
                    inner.log.append(turn.clone());
                    inner.tracker.replace(reply.transfer_state.clone());
                    self.emit(SessionEvent::TurnAppended(turn));
                    self.emit(SessionEvent::TransferStateReplaced(reply.transfer_state));
                    SendOutcome::Delivered(inner.tracker.input_mode())
                }
                Err(e) => {
                    warn!(error = %e, "message exchange failed");
                    let turn = Turn::error(SEND_FAILED);
                    inner.log.append(turn.clone());
                    self.emit(SessionEvent::TurnAppended(turn));
                    SendOutcome::Failed(ChatError::Send(e))
                }
            }
        };

        drop(guard);
        outcome
    }

    /// Answer a clarification by sending the label of the chosen option.
    pub async fn choose_option(&self, index: usize) -> SendOutcome {
        let label = {
            let inner = self.inner.lock();
            inner
                .tracker
                .input_mode()
                .options()
                .get(index)
                .map(|option| option.label.clone())
        };

        match label {
            Some(label) => self.send(&label).await,
            None => SendOutcome::Skipped(SkipReason::NoSuchOption),
        }
    }

    /// Replace the contents of the input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        self.inner.lock().input = text.into();
    }

    /// Current contents of the input buffer.
    pub fn input(&self) -> String {
        self.inner.lock().input.clone()
    }

    /// Send whatever is in the input buffer.
    pub async fn submit(&self) -> SendOutcome {
        let text = self.input();
        self.send(&text).await
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.lock().phase
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.inner.lock().session_id.clone()
    }

    /// Whether an exchange is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.lock().pending
    }

    pub fn transfer_state(&self) -> Option<TransferState> {
        self.inner.lock().tracker.current().cloned()
    }

    pub fn input_mode(&self) -> InputMode {
        self.inner.lock().tracker.input_mode()
    }

    /// Copy of the conversation so far.
    pub fn turns(&self) -> Vec<Turn> {
        self.inner.lock().log.turns().to_vec()
    }

    /// Borrow the log without copying it.
    ///
    /// The closure must not call back into the client.
    pub fn with_log<R>(&self, f: impl FnOnce(&ConversationLog) -> R) -> R {
        f(&self.inner.lock().log)
    }

    /// Everything a front end needs in one consistent read.
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock();
        SessionSnapshot {
            phase: inner.phase,
            session_id: inner.session_id.clone(),
            turns: inner.log.turns().to_vec(),
            transfer_state: inner.tracker.current().cloned(),
            input_mode: inner.tracker.input_mode(),
            busy: inner.pending,
            input: inner.input.clone(),
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}
