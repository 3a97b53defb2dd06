//! Dispatch of model tool calls to capabilities.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::capability::{
    ChartRenderer, CodeEvaluator, ExpressionEvaluator, SearchBackend, StubChart, StubSearch,
};
use super::catalog::{EXECUTE_JS_TOOL, SEARCH_TOOL, VISUALIZE_TOOL};
use crate::error::ParleyError;
use crate::types::ToolCall;
use crate::util::timeout::with_timeout;

/// Result text for a call naming a tool that does not exist.
pub const UNKNOWN_TOOL: &str = "Unknown tool";

const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes tool calls. Never fails: every failure becomes result text.
#[derive(Clone)]
pub struct ToolExecutor {
    search: Arc<dyn SearchBackend>,
    evaluator: Arc<dyn CodeEvaluator>,
    charts: Arc<dyn ChartRenderer>,
    timeout: Duration,
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self {
            search: Arc::new(StubSearch),
            evaluator: Arc::new(ExpressionEvaluator),
            charts: Arc::new(StubChart),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for ToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutor")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ToolExecutor {
    /// Executor with stub search/charts and the arithmetic evaluator.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, backend: Arc<dyn SearchBackend>) -> Self {
        self.search = backend;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn CodeEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_charts(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.charts = renderer;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one call and return its result text.
    pub async fn execute(&self, call: &ToolCall) -> String {
        debug!(tool = call.name.as_str(), "executing tool call");

        let outcome = match call.name.as_str() {
            SEARCH_TOOL => match text_argument(call, "query") {
                Ok(query) => with_timeout(self.timeout, self.search.search(&query)).await,
                Err(err) => Err(err),
            },
            EXECUTE_JS_TOOL => match text_argument(call, "code") {
                Ok(code) => with_timeout(self.timeout, self.evaluator.evaluate(&code)).await,
                Err(err) => Err(err),
            },
            VISUALIZE_TOOL => match text_argument(call, "data") {
                Ok(data) => with_timeout(self.timeout, self.charts.render(&data)).await,
                Err(err) => Err(err),
            },
            _ => {
                warn!(tool = call.name.as_str(), "model requested unknown tool");
                return UNKNOWN_TOOL.to_string();
            }
        };

        match outcome {
            Ok(text) => text,
            Err(err) => {
                warn!(tool = call.name.as_str(), error = %err, "tool call failed");
                failure_text(&err)
            }
        }
    }
}

/// Read an argument as text. Scalars are stringified and structured values
/// are passed as JSON.
fn text_argument(call: &ToolCall, key: &str) -> Result<String, ParleyError> {
    let value = match &call.arguments {
        Value::Object(map) => map.get(key),
        _ => None,
    };
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(ParleyError::tool(
            call.name.as_str(),
            format!("missing argument '{key}'"),
        )),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Ok(other.to_string()),
    }
}

fn failure_text(err: &ParleyError) -> String {
    match err {
        ParleyError::ToolExecution { message, .. } => format!("Error: {message}"),
        other => format!("Error: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct SlowEvaluator;

    #[async_trait]
    impl CodeEvaluator for SlowEvaluator {
        async fn evaluate(&self, _code: &str) -> crate::error::Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("never".into())
        }
    }

    #[tokio::test]
    async fn search_without_backend_is_stub_labeled() {
        let out = ToolExecutor::new()
            .execute(&ToolCall::new("search", json!({"query": "x"})))
            .await;
        assert_eq!(out, "Search results for \"x\" (stub).");
    }

    #[tokio::test]
    async fn execute_js_returns_value_text() {
        let out = ToolExecutor::new()
            .execute(&ToolCall::new("execute_js", json!({"code": "2+2"})))
            .await;
        assert_eq!(out, "4");
    }

    #[tokio::test]
    async fn execute_js_failure_is_error_text() {
        let out = ToolExecutor::new()
            .execute(&ToolCall::new("execute_js", json!({"code": "throw new Error('boom')"})))
            .await;
        assert!(out.starts_with("Error: "), "unexpected: {out}");
    }

    #[tokio::test]
    async fn visualize_is_stub_labeled() {
        let out = ToolExecutor::new()
            .execute(&ToolCall::new("visualize", json!({"data": [1, 2, 3]})))
            .await;
        assert_eq!(out, "Visualization created for: [1,2,3] (stub).");
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_not_raised() {
        let out = ToolExecutor::new()
            .execute(&ToolCall::new("rm_rf", json!({})))
            .await;
        assert_eq!(out, UNKNOWN_TOOL);
    }

    #[tokio::test]
    async fn missing_argument_is_error_text() {
        let out = ToolExecutor::new()
            .execute(&ToolCall::new("search", json!({})))
            .await;
        assert_eq!(out, "Error: missing argument 'query'");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_capability_times_out() {
        let executor = ToolExecutor::new()
            .with_evaluator(Arc::new(SlowEvaluator))
            .with_timeout(Duration::from_millis(100));
        let out = executor
            .execute(&ToolCall::new("execute_js", json!({"code": "1"})))
            .await;
        assert_eq!(out, "Error: Timeout after 100ms");
    }
}
