//! Host-facing session: user input, config changes, reset.

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use super::events::AgentEvent;
use super::runner::{AgentLoop, RunSummary};
use crate::config::{SessionConfig, SessionConfigUpdate, SessionHandle};
use crate::conversation::ConversationStore;
use crate::error::Result;
use crate::types::Turn;

/// One conversation bound to an agent loop.
///
/// The conversation lock is held for a whole run, so runs on the same
/// session are strictly sequential.
pub struct AgentSession {
    id: Uuid,
    agent: AgentLoop,
    config: SessionHandle,
    conversation: Mutex<ConversationStore>,
}

impl AgentSession {
    pub fn new(agent: AgentLoop, config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent,
            config: SessionHandle::new(config),
            conversation: Mutex::new(ConversationStore::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn agent(&self) -> &AgentLoop {
        &self.agent
    }

    /// Shared config handle; changes apply from the next round on.
    pub fn config(&self) -> &SessionHandle {
        &self.config
    }

    pub fn set_session_config(&self, update: SessionConfigUpdate) {
        debug!(session = %self.id, provider = ?update.provider, model = ?update.model, "session config updated");
        self.config.update(update);
    }

    /// Append a user turn and run the loop. Blank input is ignored.
    pub async fn submit_user_message(&self, text: &str) -> Result<Option<RunSummary>> {
        self.submit_with_cancel(text, &CancellationToken::new()).await
    }

    pub async fn submit_with_cancel(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<RunSummary>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let mut conversation = self.conversation.lock().await;
        let turn = Turn::user(text);
        conversation.append(turn.clone());
        self.agent.emit(AgentEvent::TurnAppended { turn });

        self.agent
            .run_with_cancel(&self.config, &mut conversation, cancel)
            .await
            .map(Some)
    }

    /// Drop the whole conversation (session restart).
    pub async fn reset(&self) {
        self.conversation.lock().await.reset();
    }

    /// Copy of the conversation so far.
    pub async fn turns(&self) -> Vec<Turn> {
        self.conversation.lock().await.turns().to_vec()
    }
}
