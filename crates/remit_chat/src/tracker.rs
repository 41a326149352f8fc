//! Transfer state tracking and input mode selection.

use crate::types::{InputMode, TransferState};

/// Holds the latest transfer snapshot reported by the agent.
///
/// Each reply replaces the snapshot wholesale. Fields are never merged, so a
/// field missing from the newest reply is missing from the tracker too.
#[derive(Debug, Clone, Default)]
pub struct TransferTracker {
    current: Option<TransferState>,
}

impl TransferTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot, discarding the previous one.
    pub fn replace(&mut self, state: Option<TransferState>) {
        self.current = state;
    }

    /// The current snapshot, if the agent has sent one.
    pub fn current(&self) -> Option<&TransferState> {
        self.current.as_ref()
    }

    /// Input mode implied by the current snapshot.
    pub fn input_mode(&self) -> InputMode {
        select_input_mode(self.current())
    }
}

/// Decide which input affordance the current state allows.
///
/// Clarification requires both the flag and at least one option; a flag with
/// an empty list falls back to free text.
pub fn select_input_mode(state: Option<&TransferState>) -> InputMode {
    match state {
        Some(s) if s.needs_clarification && !s.clarification_options.is_empty() => {
            InputMode::Clarification(s.clarification_options.clone())
        }
        _ => InputMode::FreeText,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClarificationOption;

    fn currency_options() -> Vec<ClarificationOption> {
        vec![
            ClarificationOption::new("USD", "USD"),
            ClarificationOption::new("EUR", "EUR"),
        ]
    }

    #[test]
    fn test_initially_free_text() {
        let tracker = TransferTracker::new();
        assert!(tracker.current().is_none());
        assert_eq!(tracker.input_mode(), InputMode::FreeText);
    }

    #[test]
    fn test_clarification_with_options() {
        let state = TransferState::default().with_clarification(currency_options());
        match select_input_mode(Some(&state)) {
            InputMode::Clarification(options) => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[0].label, "USD");
            }
            other => panic!("expected clarification, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_options_ignored_without_flag() {
        let state = TransferState {
            needs_clarification: false,
            clarification_options: currency_options(),
            ..Default::default()
        };
        assert_eq!(select_input_mode(Some(&state)), InputMode::FreeText);
    }

    #[test]
    fn test_flag_without_options_is_free_text() {
        let state = TransferState::default().with_clarification(Vec::new());
        assert_eq!(select_input_mode(Some(&state)), InputMode::FreeText);
    }

    #[test]
    fn test_selection_is_idempotent() {
        let states = [
            TransferState::default(),
            TransferState::default().with_clarification(currency_options()),
            TransferState::default().with_clarification(Vec::new()),
        ];
        for state in &states {
            assert_eq!(select_input_mode(Some(state)), select_input_mode(Some(state)));
        }
    }

    #[test]
    fn test_replace_does_not_merge() {
        let mut tracker = TransferTracker::new();
        tracker.replace(Some(
            TransferState::default()
                .with_beneficiary("John Smith")
                .with_country("Brazil"),
        ));
        tracker.replace(Some(TransferState::default().with_amount(100.0, "USD")));

        let current = tracker.current().unwrap();
        assert!(current.beneficiary_name.is_none());
        assert!(current.destination_country.is_none());
        assert_eq!(current.currency.as_deref(), Some("USD"));

        tracker.replace(None);
        assert!(tracker.current().is_none());
    }
}
