//! Events surfaced to the presentation layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Turn;

/// Unique run identifier.
pub type RunId = Uuid;

/// Callback receiving agent events.
pub type EventSink = Arc<dyn Fn(AgentEvent) + Send + Sync>;

/// Everything the presentation layer is told about a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A request round is about to be sent.
    RoundStarted { run_id: RunId, round: usize },
    /// A turn was committed to the conversation.
    TurnAppended { turn: Turn },
    /// A run failed. The message is also recorded as an `error` turn.
    Error { message: String },
    /// The model stopped requesting tools.
    RunCompleted { run_id: RunId, rounds: usize },
}
