//! # remit_chat - Conversation core for the Send Money Agent
//!
//! This crate drives a multi-turn dialogue with a remote money-transfer
//! agent:
//! - Creates exactly one session per client
//! - Keeps an append-only log of user, assistant and error turns
//! - Tracks the transfer snapshot the agent returns with every reply
//! - Derives whether the next input is free text or a clarification choice
//! - Allows one exchange in flight at a time
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │   Front end     │────▶│   ChatClient    │────▶│    Transport    │
//! └────────▲────────┘     └────────┬────────┘     └─────────────────┘
//!          │                       │
//!          │ SessionEvent          ▼
//!          │              ┌─────────────────┐
//!          └──────────────│ Log + Tracker   │
//!                         │ + Input mode    │
//!                         └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use remit_chat::{ChatClient, ChatConfig, HttpTransport, InputMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ChatConfig::new("http://localhost:8000").validated()?;
//!     let client = ChatClient::new(HttpTransport::new(config)?);
//!
//!     client.initialize().await?;
//!     client.send("Send 100 dollars to John Smith").await;
//!
//!     if let InputMode::Clarification(options) = client.input_mode() {
//!         println!("{} options on offer", options.len());
//!         client.choose_option(0).await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod log;
pub mod mock;
pub mod session;
pub mod tracker;
pub mod transport;
pub mod types;

pub use config::{ChatConfig, API_BASE_URL_ENV, DEFAULT_API_BASE_URL};
pub use error::{ChatError, ChatResult, TransportError, TransportResult};
pub use log::ConversationLog;
pub use mock::{CapturedCall, ScriptedReply, ScriptedTransport};
pub use session::{ChatClient, SendOutcome, SessionEvent, SessionSnapshot, SkipReason};
pub use tracker::{select_input_mode, TransferTracker};
pub use transport::{HealthStatus, HttpTransport, Transport};
pub use types::*;
