//! Error types for the chat client.

use thiserror::Error;

/// Result type alias for transport exchanges.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Failure of a single request/response exchange with the agent API.
///
/// Carries no partial result: a reply that arrived with a non-success status
/// or an undecodable body is reported the same way as a dropped connection.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Agent API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl TransportError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Chat client errors.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The create-session exchange failed; the client can no longer send.
    #[error("Failed to create session: {0}")]
    SessionInit(#[source] TransportError),

    /// A send-message exchange failed; the user may retry.
    #[error("Failed to send message: {0}")]
    Send(#[source] TransportError),

    /// `initialize` was called on a client that already ran it.
    #[error("Session already initialized")]
    AlreadyInitialized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// Whether the client is permanently unusable after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SessionInit(_))
    }
}
