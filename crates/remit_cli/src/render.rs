//! Terminal rendering of conversation events.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use remit_chat::{
    select_input_mode, ClarificationOption, InputMode, Role, SessionEvent, TransferState, Turn,
};

/// Prints session events as they arrive.
pub struct Renderer {
    /// Print user turns too (transcripts); interactive sessions already show them
    echo_user: bool,
}

impl Renderer {
    pub fn new(echo_user: bool) -> Self {
        Self { echo_user }
    }

    /// Render every event queued on the receiver.
    pub fn drain(&mut self, events: &mut broadcast::Receiver<SessionEvent>) {
        loop {
            match events.try_recv() {
                Ok(event) => self.render(&event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "renderer fell behind, some events were dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn render(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::TurnAppended(turn) => {
                if turn.role != Role::User || self.echo_user {
                    println!("{}", format_turn(turn));
                }
            }
            SessionEvent::TransferStateReplaced(Some(state)) => {
                if let Some(details) = format_transfer_details(state) {
                    println!("{}", details);
                }
                if let InputMode::Clarification(options) = select_input_mode(Some(state)) {
                    println!("{}", format_options(&options));
                }
            }
            SessionEvent::BusyChanged(true) => {
                if !self.echo_user {
                    println!("  …");
                }
            }
            _ => {}
        }
    }
}

/// One line per turn, prefixed by who said it.
pub fn format_turn(turn: &Turn) -> String {
    let prefix = match turn.role {
        Role::User => "you",
        Role::Assistant => "agent",
        Role::Error => "error",
    };
    format!("{}> {}", prefix, turn.content)
}

/// Known transfer fields, or `None` when nothing is known yet.
pub fn format_transfer_details(state: &TransferState) -> Option<String> {
    if !state.has_details() {
        return None;
    }

    let mut lines = vec!["┌ TRANSFER DETAILS".to_string()];
    if let Some(ref name) = state.beneficiary_name {
        lines.push(format!("│ Beneficiary: {}", name));
    }
    if let Some(ref country) = state.destination_country {
        lines.push(format!("│ Country:     {}", country));
    }
    if let Some(amount) = state.amount {
        let currency = state.currency.as_deref().unwrap_or_default();
        lines.push(format!("│ Amount:      ${} {}", amount, currency).trim_end().to_string());
    }
    if let Some(ref method) = state.delivery_method {
        lines.push(format!("│ Delivery:    {}", method));
    }
    lines.push("└".to_string());

    Some(lines.join("\n"))
}

/// Numbered list of clarification choices.
pub fn format_options(options: &[ClarificationOption]) -> String {
    let mut out = String::from("Please select one:");
    for (i, option) in options.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, option.label));
    }
    out
}

/// Prompt for the current input mode.
pub fn prompt(mode: &InputMode) -> String {
    match mode {
        InputMode::FreeText => "> ".to_string(),
        InputMode::Clarification(options) => format!("[1-{}]> ", options.len()),
    }
}

/// Map a typed line to an option index, if it names one.
pub fn parse_choice(line: &str, option_count: usize) -> Option<usize> {
    match line.trim().parse::<usize>() {
        Ok(n) if (1..=option_count).contains(&n) => Some(n - 1),
        _ => None,
    }
}
