//! Provider wire formats, registry and transport.

pub mod anthropic;
pub mod google;
pub mod http;
pub mod normalize;
pub mod openai;
pub mod registry;

pub use http::{HttpTransport, Transport};
pub use normalize::{normalize_response, NormalizedResponse, UNSUPPORTED_PROVIDER_TEXT};
pub use registry::{AuthScheme, ProviderEntry, ProviderId, ProviderRegistry};

use crate::error::Result;
use crate::tools::ToolCatalog;
use crate::types::Turn;

/// Inputs for building one provider payload.
#[derive(Debug, Clone, Copy)]
pub struct WireRequest<'a> {
    pub model: &'a str,
    pub turns: &'a [&'a Turn],
    /// Present only for providers that support tool calling.
    pub tools: Option<&'a ToolCatalog>,
    pub max_tokens: u32,
}

/// Request and response shape of one provider family.
pub trait WireFormat: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Build the JSON body for a request.
    fn build_body(&self, request: &WireRequest<'_>) -> serde_json::Value;

    /// Extract text and tool calls from a successful response body.
    fn normalize(&self, body: &serde_json::Value) -> Result<NormalizedResponse>;
}
