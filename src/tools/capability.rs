//! External capabilities behind the built-in tools.
//!
//! The host supplies real backends; the defaults here are stubs (search,
//! charts) and a restricted arithmetic evaluator (code). None of them perform
//! I/O.

use async_trait::async_trait;

use super::catalog::EXECUTE_JS_TOOL;
use crate::error::{ParleyError, Result};

/// Web search backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<String>;
}

/// Sandboxed code evaluator.
///
/// Implementations own the trust boundary: they must not expose ambient I/O
/// to the evaluated code. The executor applies a timeout around every call.
#[async_trait]
pub trait CodeEvaluator: Send + Sync {
    async fn evaluate(&self, code: &str) -> Result<String>;
}

/// Chart renderer.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(&self, spec: &str) -> Result<String>;
}

/// Placeholder search used when no backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubSearch;

#[async_trait]
impl SearchBackend for StubSearch {
    async fn search(&self, query: &str) -> Result<String> {
        Ok(format!("Search results for \"{query}\" (stub)."))
    }
}

/// Placeholder renderer used when no backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubChart;

#[async_trait]
impl ChartRenderer for StubChart {
    async fn render(&self, spec: &str) -> Result<String> {
        Ok(format!("Visualization created for: {spec} (stub)."))
    }
}

/// Arithmetic-only evaluator backed by `meval`.
///
/// Accepts expressions such as `2+2` or `sqrt(16) * 3`. Anything else,
/// statements included, is rejected with an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

#[async_trait]
impl CodeEvaluator for ExpressionEvaluator {
    async fn evaluate(&self, code: &str) -> Result<String> {
        let expr = code.trim().trim_end_matches(';').trim();
        if expr.is_empty() {
            return Ok("undefined".to_string());
        }
        let value = meval::eval_str(expr).map_err(|e| ParleyError::tool(EXECUTE_JS_TOOL, e.to_string()))?;
        Ok(format_number(value))
    }
}

/// Render a number the way a JavaScript host would (`4`, not `4.0`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{value:.0}");
    }
    value.to_string()
}
