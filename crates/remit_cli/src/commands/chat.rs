//! Chat command - Interactive conversation with the agent.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use remit_chat::{ChatClient, ChatConfig, HttpTransport, InputMode, SendOutcome};

use crate::render::{parse_choice, prompt, Renderer};

#[derive(Args)]
pub struct ChatArgs {
    /// Message to send right after the session is created
    #[arg(short, long)]
    message: Option<String>,
}

pub async fn execute(args: ChatArgs, config: ChatConfig) -> Result<()> {
    info!("Connecting to {}", config.api_base_url);

    let client = ChatClient::new(HttpTransport::new(config)?);
    let mut events = client.subscribe();
    let mut renderer = Renderer::new(false);

    let init = client.initialize().await;
    renderer.drain(&mut events);
    init?;

    if let Some(message) = args.message {
        println!("you> {}", message);
        client.send(&message).await;
        renderer.drain(&mut events);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let mode = client.input_mode();
        print!("{}", prompt(&mode));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == "/quit" {
            break;
        }

        let outcome = match mode {
            InputMode::Clarification(ref options) => match parse_choice(&line, options.len()) {
                Some(index) => client.choose_option(index).await,
                None => {
                    println!("Please select one of the options (1-{}).", options.len());
                    continue;
                }
            },
            InputMode::FreeText => {
                client.set_input(line);
                client.submit().await
            }
        };

        renderer.drain(&mut events);

        match outcome {
            SendOutcome::Skipped(reason) => debug!(?reason, "nothing sent"),
            SendOutcome::Failed(e) => debug!(error = %e, "exchange failed"),
            SendOutcome::Delivered(_) => {}
        }
    }

    println!("Goodbye!");
    Ok(())
}
