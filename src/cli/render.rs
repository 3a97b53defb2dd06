//! Terminal rendering of agent events.

use crate::agent::AgentEvent;
use crate::types::Role;

/// Where a rendered line goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Stdout(String),
    Stderr(String),
}

impl Line {
    pub fn print(&self) {
        match self {
            Self::Stdout(text) => println!("{text}"),
            Self::Stderr(text) => eprintln!("{text}"),
        }
    }
}

/// Render one event. Run failures render nothing here: the caller gets the
/// same error back from the session and reports it once.
pub fn render_event(event: &AgentEvent) -> Option<Line> {
    match event {
        AgentEvent::TurnAppended { turn } => match turn.role {
            Role::User => None,
            Role::Tool => Some(Line::Stderr(format!("  ⚡ {}", turn.display_text()))),
            Role::Assistant | Role::Error => Some(Line::Stdout(turn.content.clone())),
        },
        AgentEvent::Error { message } => {
            tracing::debug!(%message, "run failed");
            None
        }
        AgentEvent::RoundStarted { round, .. } => {
            tracing::debug!(round, "round started");
            None
        }
        AgentEvent::RunCompleted { rounds, .. } => {
            tracing::debug!(rounds, "run completed");
            None
        }
    }
}
