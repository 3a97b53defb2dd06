//! Conversation history management.

use serde::{Deserialize, Serialize};

use crate::types::{Role, Turn};

/// Whether `error` turns are sent back to the provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorTurnPolicy {
    /// Error turns stay local to the presentation layer.
    #[default]
    Exclude,
    /// Error turns are sent as user-role text so the model can react.
    Include,
}

/// Ordered, append-only log of turns.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the end of the log.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Append a user turn.
    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.append(Turn::user(text));
    }

    /// Append every turn of a finished round, in order.
    pub fn commit(&mut self, turns: impl IntoIterator<Item = Turn>) {
        self.turns.extend(turns);
    }

    /// All turns in chronological order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns that go into the next provider request.
    pub fn outbound(&self, policy: ErrorTurnPolicy) -> Vec<&Turn> {
        self.turns
            .iter()
            .filter(|turn| turn.role != Role::Error || policy == ErrorTurnPolicy::Include)
            .collect()
    }

    /// Clear all turns (session restart).
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
