//! Canonical `{ text, tool_calls }` view of a provider response.

use crate::error::Result;
use crate::types::ToolCall;

use super::ProviderId;

/// Text returned for a provider id the normalizer does not know.
pub const UNSUPPORTED_PROVIDER_TEXT: &str = "Unsupported provider";

/// Provider-independent response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

impl NormalizedResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn unsupported() -> Self {
        Self::text(UNSUPPORTED_PROVIDER_TEXT)
    }
}

/// Normalize a response body for the provider named `provider`.
///
/// Unknown providers yield [`UNSUPPORTED_PROVIDER_TEXT`] instead of an error.
/// Malformed bodies for known providers are provider errors.
pub fn normalize_response(provider: &str, body: &serde_json::Value) -> Result<NormalizedResponse> {
    match ProviderId::parse(provider) {
        Some(id) => id.wire().normalize(body),
        None => Ok(NormalizedResponse::unsupported()),
    }
}
