//! The agent loop: request, normalize, run tools, repeat.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::events::{AgentEvent, EventSink, RunId};
use crate::config::{AgentSettings, SessionConfig, SessionHandle};
use crate::conversation::ConversationStore;
use crate::error::{ParleyError, Result};
use crate::provider::http::request_headers;
use crate::provider::{
    normalize_response, HttpTransport, ProviderRegistry, Transport, WireRequest,
};
use crate::tools::{ToolCatalog, ToolExecutor};
use crate::types::Turn;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: RunId,
    /// Request rounds sent, including the final one without tool calls.
    pub rounds: usize,
    /// Assistant and tool turns committed by the run.
    pub turns_appended: usize,
}

/// Turns produced by one round, committed together.
struct RoundOutcome {
    turns: Vec<Turn>,
    had_tool_calls: bool,
}

/// Drives rounds against a provider until the model stops calling tools.
pub struct AgentLoop {
    registry: ProviderRegistry,
    catalog: ToolCatalog,
    executor: ToolExecutor,
    transport: Arc<dyn Transport>,
    settings: AgentSettings,
    sink: Option<EventSink>,
}

impl Default for AgentLoop {
    fn default() -> Self {
        Self::new(ProviderRegistry::new())
    }
}

impl AgentLoop {
    /// Loop with the built-in tools, default capabilities and HTTP transport.
    pub fn new(registry: ProviderRegistry) -> Self {
        let settings = AgentSettings::default();
        Self {
            registry,
            catalog: ToolCatalog::builtin(),
            executor: ToolExecutor::new().with_timeout(settings.tool_timeout),
            transport: Arc::new(HttpTransport::default()),
            settings,
            sink: None,
        }
    }

    pub fn with_catalog(mut self, catalog: ToolCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_executor(mut self, executor: ToolExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the settings. The tool timeout is pushed into the executor and
    /// a zero round limit is raised to one.
    pub fn with_settings(mut self, mut settings: AgentSettings) -> Self {
        if settings.max_rounds == 0 {
            warn!("max_rounds of 0 raised to 1");
            settings.max_rounds = 1;
        }
        self.executor = self.executor.with_timeout(settings.tool_timeout);
        self.settings = settings;
        self
    }

    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub(crate) fn emit(&self, event: AgentEvent) {
        if let Some(sink) = &self.sink {
            (sink)(event);
        }
    }

    /// Run rounds until a response carries no tool calls.
    pub async fn run(
        &self,
        session: &SessionHandle,
        conversation: &mut ConversationStore,
    ) -> Result<RunSummary> {
        self.run_with_cancel(session, conversation, &CancellationToken::new())
            .await
    }

    /// Like [`AgentLoop::run`], stopping early when `cancel` fires.
    ///
    /// A cancelled or failed round appends nothing; turns from earlier rounds
    /// stay. Failures other than cancellation are emitted as
    /// [`AgentEvent::Error`] and recorded as an `error` turn.
    pub async fn run_with_cancel(
        &self,
        session: &SessionHandle,
        conversation: &mut ConversationStore,
        cancel: &CancellationToken,
    ) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let mut turns_appended = 0usize;

        for round in 1..=self.settings.max_rounds {
            self.emit(AgentEvent::RoundStarted { run_id, round });

            let outcome = match self.round(session.snapshot(), conversation, cancel).await {
                Ok(outcome) => outcome,
                Err(err) => return Err(self.fail(conversation, err)),
            };

            turns_appended += outcome.turns.len();
            for turn in &outcome.turns {
                self.emit(AgentEvent::TurnAppended { turn: turn.clone() });
            }
            conversation.commit(outcome.turns);

            debug!(
                %run_id,
                round,
                had_tool_calls = outcome.had_tool_calls,
                conversation_len = conversation.len(),
                "round complete"
            );

            if !outcome.had_tool_calls {
                self.emit(AgentEvent::RunCompleted { run_id, rounds: round });
                return Ok(RunSummary {
                    run_id,
                    rounds: round,
                    turns_appended,
                });
            }
        }

        let err = ParleyError::RoundLimitExceeded {
            limit: self.settings.max_rounds,
        };
        Err(self.fail(conversation, err))
    }

    /// One request/response cycle plus tool execution. Nothing is appended here.
    async fn round(
        &self,
        config: SessionConfig,
        conversation: &ConversationStore,
        cancel: &CancellationToken,
    ) -> Result<RoundOutcome> {
        if !config.has_credentials() {
            return Err(ParleyError::Configuration(format!(
                "missing API key for provider {}",
                config.provider
            )));
        }

        let entry = self.registry.resolve(config.provider.as_str())?;
        let body = {
            let turns = conversation.outbound(self.settings.error_turn_policy);
            entry.wire().build_body(&WireRequest {
                model: &config.model,
                turns: &turns,
                tools: entry.supports_tools.then_some(&self.catalog),
                max_tokens: self.settings.anthropic_max_tokens,
            })
        };
        let url = entry.endpoint_url(&config)?;
        let headers = request_headers(entry.auth, &config.api_key);

        debug!(
            provider = entry.id.as_str(),
            model = config.model.as_str(),
            wire = entry.wire().name(),
            "sending round"
        );

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ParleyError::Cancelled),
            response = self.transport.post_json(entry.id, url, headers, &body) => response?,
        };

        let normalized = normalize_response(entry.id.as_str(), &response)?;

        let mut turns = Vec::with_capacity(1 + normalized.tool_calls.len());
        if !normalized.text.is_empty() {
            turns.push(Turn::assistant(normalized.text));
        }

        let had_tool_calls = !normalized.tool_calls.is_empty();
        for call in normalized.tool_calls {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ParleyError::Cancelled),
                result = self.executor.execute(&call) => result,
            };
            turns.push(Turn::tool(call, result));
        }

        Ok(RoundOutcome {
            turns,
            had_tool_calls,
        })
    }

    fn fail(&self, conversation: &mut ConversationStore, err: ParleyError) -> ParleyError {
        if matches!(err, ParleyError::Cancelled) {
            debug!("run cancelled");
            return err;
        }
        warn!(error = %err, "run failed");
        let message = err.to_string();
        conversation.append(Turn::error(message.clone()));
        self.emit(AgentEvent::Error { message });
        err
    }
}
