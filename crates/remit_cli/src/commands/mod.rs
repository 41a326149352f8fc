//! CLI command definitions.
//!
//! This module defines the command structure for the remit CLI. Every
//! subcommand talks to one agent API whose base URL comes from the layered
//! configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use remit_chat::ChatConfig;

pub mod ask;
pub mod chat;
pub mod health;
pub mod state;

/// remit - talk to the Send Money Agent from a terminal
#[derive(Parser)]
#[command(name = "remit")]
#[command(version, about = "remit - talk to the Send Money Agent from a terminal")]
#[command(long_about = r#"
remit is a terminal client for the Send Money Agent, a conversational
assistant that builds international money transfers step by step.

COMMANDS:
  chat    → Interactive conversation (type /quit to leave)
  ask     → Send scripted messages and print the transcript
  health  → Check that the agent API is up
  state   → Show the server's transfer state for a session

CONFIGURATION (lowest to highest priority):
  defaults → remit.toml → REMIT_API_BASE_URL → --api-base-url

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
  4 - Could not reach the agent
  5 - A message exchange failed
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file
    #[arg(long, global = true, env = "REMIT_CONFIG", default_value = "remit.toml")]
    pub config: PathBuf,

    /// Base URL of the agent API
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve the effective configuration.
    pub fn config(&self) -> Result<ChatConfig> {
        let mut config = ChatConfig::load(Some(self.config.as_path()))?;

        if let Some(ref url) = self.api_base_url {
            config = config.api_base_url(url.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.request_timeout_secs(secs);
        }

        Ok(config.validated()?)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation
    Chat(chat::ChatArgs),

    /// Send scripted messages and print the transcript
    Ask(ask::AskArgs),

    /// Check that the agent API is up
    Health,

    /// Show the server's transfer state for a session
    State(state::StateArgs),
}
