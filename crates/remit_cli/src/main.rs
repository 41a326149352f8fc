//! remit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Configuration error
//! - 4: Could not reach the agent
//! - 5: A message exchange failed

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use remit_chat::{ChatError, TransportError};

mod commands;
mod render;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const CONNECT_ERROR: u8 = 4;
    pub const SEND_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "remit_cli=debug,remit_chat=debug,warn"
    } else if cli.quiet {
        "error"
    } else {
        "remit_cli=info,remit_chat=info,warn"
    };

    // Logs go to stderr so they do not interleave with the conversation
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.config() {
        Ok(config) => match cli.command {
            Commands::Chat(args) => commands::chat::execute(args, config).await,
            Commands::Ask(args) => commands::ask::execute(args, config).await,
            Commands::Health => commands::health::execute(config).await,
            Commands::State(args) => commands::state::execute(args, config).await,
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(chat) = e.downcast_ref::<ChatError>() {
        return match chat {
            ChatError::Config(_) => ExitCodes::CONFIG_ERROR,
            ChatError::SessionInit(_) => ExitCodes::CONNECT_ERROR,
            ChatError::Send(_) => ExitCodes::SEND_ERROR,
            _ => ExitCodes::GENERAL_ERROR,
        };
    }

    if let Some(transport) = e.downcast_ref::<TransportError>() {
        return match transport {
            TransportError::InvalidEndpoint(_) => ExitCodes::INVALID_ARGS,
            _ => ExitCodes::CONNECT_ERROR,
        };
    }

    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_chat_errors() {
        let config = anyhow::Error::new(ChatError::Config("bad".into()));
        assert_eq!(categorize_error(&config), ExitCodes::CONFIG_ERROR);

        let init = anyhow::Error::new(ChatError::SessionInit(TransportError::Decode("x".into())));
        assert_eq!(categorize_error(&init), ExitCodes::CONNECT_ERROR);

        let other = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&other), ExitCodes::GENERAL_ERROR);
    }

    #[test]
    fn test_failed_send_maps_to_send_error() {
        let failure = ChatError::Send(TransportError::Status {
            status: 500,
            body: String::new(),
        });
        let err = commands::ask::report_failures(Some(failure), 1, 3).unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::SEND_ERROR);
        assert!(format!("{:#}", err).starts_with("1 of 3 message(s) failed"));

        assert!(commands::ask::report_failures(None, 0, 3).is_ok());
    }

    #[test]
    fn test_categorize_transport_errors() {
        let endpoint = anyhow::Error::new(TransportError::InvalidEndpoint("x".into()));
        assert_eq!(categorize_error(&endpoint), ExitCodes::INVALID_ARGS);

        let status = anyhow::Error::new(TransportError::Status {
            status: 404,
            body: String::new(),
        });
        assert_eq!(categorize_error(&status), ExitCodes::CONNECT_ERROR);
    }
}
