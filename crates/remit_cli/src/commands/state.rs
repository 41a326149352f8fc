//! State command - Show the server's transfer state for a session.

use anyhow::Result;
use clap::Args;

use remit_chat::{select_input_mode, ChatConfig, HttpTransport, InputMode};

use crate::render::{format_options, format_transfer_details};

#[derive(Args)]
pub struct StateArgs {
    /// Session to inspect
    session_id: String,

    /// Print raw JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: StateArgs, config: ChatConfig) -> Result<()> {
    let transport = HttpTransport::new(config)?;
    let state = transport.fetch_state(&args.session_id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    match format_transfer_details(&state) {
        Some(details) => println!("{}", details),
        None => println!("No transfer details known yet for session {}", args.session_id),
    }
    if let InputMode::Clarification(options) = select_input_mode(Some(&state)) {
        println!("{}", format_options(&options));
    }
    Ok(())
}
