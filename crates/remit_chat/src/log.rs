//! Append-only conversation log.

use crate::types::{Role, Turn};

/// Ordered record of every turn exchanged in a session.
///
/// Turns are only ever appended. Iteration borrows the log, so readers can
/// walk it as often as they like without changing it.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn to the end of the log.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Iterate turns in chronological order.
    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// Borrow all turns.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns with the given role.
    pub fn count_role(&self, role: Role) -> usize {
        self.turns.iter().filter(|t| t.role == role).count()
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut log = ConversationLog::new();
        log.append(Turn::assistant("hi"));
        log.append(Turn::user("John Smith"));
        log.append(Turn::error("oops"));

        let roles: Vec<Role> = log.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Error]);
        assert_eq!(log.last().map(|t| t.content.as_str()), Some("oops"));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut log = ConversationLog::new();
        log.append(Turn::user("a"));
        log.append(Turn::user("b"));

        let first: Vec<&str> = log.iter().map(|t| t.content.as_str()).collect();
        let second: Vec<&str> = (&log).into_iter().map(|t| t.content.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(log.len(), 2);
        assert_eq!(log.count_role(Role::User), 2);
    }
}
