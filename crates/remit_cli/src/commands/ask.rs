//! Ask command - Send scripted messages and print the transcript.

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use remit_chat::{ChatClient, ChatConfig, ChatError, HttpTransport, InputMode, SendOutcome};

use crate::render::{parse_choice, Renderer};

#[derive(Args)]
pub struct AskArgs {
    /// Message to send; repeat for a multi-turn script. While the agent asks
    /// for clarification a number picks that option.
    #[arg(short, long = "message", required = true)]
    pub messages: Vec<String>,

    /// Print the final transfer state as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: AskArgs, config: ChatConfig) -> Result<()> {
    info!("Running {} scripted message(s)", args.messages.len());

    let client = ChatClient::new(HttpTransport::new(config)?);
    let mut events = client.subscribe();
    let mut renderer = Renderer::new(true);

    let init = client.initialize().await;
    renderer.drain(&mut events);
    init?;

    let mut failures = 0;
    let mut last_failure = None;
    for message in &args.messages {
        let outcome = match client.input_mode() {
            InputMode::Clarification(options) => match parse_choice(message, options.len()) {
                Some(index) => client.choose_option(index).await,
                None => client.send(message).await,
            },
            InputMode::FreeText => client.send(message).await,
        };
        renderer.drain(&mut events);

        match outcome {
            SendOutcome::Failed(e) => {
                warn!(error = %e, "message failed");
                failures += 1;
                last_failure = Some(e);
            }
            SendOutcome::Skipped(reason) => warn!(?reason, message = %message, "message skipped"),
            SendOutcome::Delivered(_) => {}
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&client.transfer_state())?);
    }

    report_failures(last_failure, failures, args.messages.len())
}

/// Surface the last send failure so the exit code reflects it.
pub(crate) fn report_failures(
    last_failure: Option<ChatError>,
    failures: usize,
    total: usize,
) -> Result<()> {
    match last_failure {
        Some(e) => Err(anyhow::Error::new(e)
            .context(format!("{} of {} message(s) failed", failures, total))),
        None => Ok(()),
    }
}
