//! Core types for the Send Money Agent conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque session token issued by the agent API
pub type SessionId = String;

/// Greeting seeded into the log once a session exists
pub const GREETING: &str = "Hello! I'm your Send Money Agent. I'll help you transfer money internationally. Who would you like to send money to?";

/// Error turn recorded when the session could not be created
pub const CONNECT_FAILED: &str = "Failed to connect to the server. Please restart the client.";

/// Error turn recorded when a message exchange fails
pub const SEND_FAILED: &str =
    "Sorry, there was an error processing your message. Please try again.";

/// Who produced a turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Error,
}

/// A single entry in the conversation log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    /// Role of the sender
    pub role: Role,
    /// Message content
    pub content: String,
    /// When the client recorded the turn
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Create a new user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a new error turn
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Error, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// One choice offered while the agent needs clarification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClarificationOption {
    /// Text shown to the user and sent back when chosen
    pub label: String,
    /// Server-side value, not interpreted by the client
    #[serde(default)]
    pub value: serde_json::Value,
    /// Optional identifier (contact id for beneficiary choices)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ClarificationOption {
    pub fn new(label: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            id: None,
        }
    }
}

/// Snapshot of the transfer being assembled by the agent.
///
/// Every field is optional on the wire. A missing field means the agent does
/// not know it yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransferState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<String>,
    pub needs_clarification: bool,
    pub clarification_options: Vec<ClarificationOption>,
    /// Field the agent asked about last (e.g. "beneficiary")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_asked_field: Option<String>,
}

impl TransferState {
    /// Whether any transfer detail is known yet.
    pub fn has_details(&self) -> bool {
        self.beneficiary_name.is_some()
            || self.destination_country.is_some()
            || self.amount.is_some()
            || self.delivery_method.is_some()
    }

    /// Builder used mostly by tests and scripted transports.
    pub fn with_beneficiary(mut self, name: impl Into<String>) -> Self {
        self.beneficiary_name = Some(name.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.destination_country = Some(country.into());
        self
    }

    pub fn with_amount(mut self, amount: f64, currency: impl Into<String>) -> Self {
        self.amount = Some(amount);
        self.currency = Some(currency.into());
        self
    }

    pub fn with_delivery_method(mut self, method: impl Into<String>) -> Self {
        self.delivery_method = Some(method.into());
        self
    }

    pub fn with_clarification(mut self, options: Vec<ClarificationOption>) -> Self {
        self.needs_clarification = true;
        self.clarification_options = options;
        self
    }
}

/// Reply to a send-message exchange
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    /// Assistant text to show
    pub response_text: String,
    /// Full transfer snapshot, or `None` when the server sent none
    pub transfer_state: Option<TransferState>,
}

impl AgentReply {
    pub fn new(response_text: impl Into<String>, transfer_state: Option<TransferState>) -> Self {
        Self {
            response_text: response_text.into(),
            transfer_state,
        }
    }
}

/// Which input affordance the front end may offer next
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Any text may be typed
    FreeText,
    /// The user must pick one of these options
    Clarification(Vec<ClarificationOption>),
}

impl InputMode {
    pub fn is_clarification(&self) -> bool {
        matches!(self, Self::Clarification(_))
    }

    /// Options on offer; empty in free-text mode.
    pub fn options(&self) -> &[ClarificationOption] {
        match self {
            Self::FreeText => &[],
            Self::Clarification(options) => options,
        }
    }
}

/// Lifecycle of the single session a client owns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    /// `initialize` has not settled yet
    Starting,
    /// A session exists and messages may be sent
    Ready,
    /// Session creation failed; terminal
    Failed,
}
