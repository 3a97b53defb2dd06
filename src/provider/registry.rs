//! Static provider table: identifiers, endpoints, auth and capability flags.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::anthropic::AnthropicMessagesFormat;
use super::google::GeminiFormat;
use super::openai::OpenAiChatFormat;
use super::WireFormat;
use crate::config::SessionConfig;
use crate::error::{ParleyError, Result};

/// Known providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Google,
    /// OpenAI-compatible proxy (OpenRouter routed through aipipe.org).
    AiPipe,
}

/// How the credential travels with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// Key in the URL query string, no authorization header.
    QueryKey,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [Self::OpenAi, Self::Anthropic, Self::Google, Self::AiPipe];

    /// Canonical provider id string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::AiPipe => "aipipe",
        }
    }

    /// Parse user-facing provider aliases into a typed id.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "anthropic" | "claude" => Some(Self::Anthropic),
            "google" | "gemini" => Some(Self::Google),
            "aipipe" | "openrouter" => Some(Self::AiPipe),
            _ => None,
        }
    }

    pub const fn default_endpoint(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1/chat/completions",
            Self::Anthropic => "https://api.anthropic.com/v1/messages",
            Self::Google => "https://generativelanguage.googleapis.com/v1beta/models",
            Self::AiPipe => "https://aipipe.org/openrouter/v1/chat/completions",
        }
    }

    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
            Self::Google => "gemini-2.0-flash",
            Self::AiPipe => "openai/gpt-4o-mini",
        }
    }

    pub const fn auth(self) -> AuthScheme {
        match self {
            Self::Google => AuthScheme::QueryKey,
            _ => AuthScheme::Bearer,
        }
    }

    /// Whether the tool catalog is sent and tool calls are read back.
    pub const fn supports_tools(self) -> bool {
        matches!(self, Self::OpenAi | Self::AiPipe)
    }

    /// Provider-specific environment variable holding the API key.
    pub const fn api_key_env(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Google => "GOOGLE_API_KEY",
            Self::AiPipe => "AIPIPE_TOKEN",
        }
    }

    /// Environment variable overriding the endpoint.
    pub const fn endpoint_env(self) -> &'static str {
        match self {
            Self::OpenAi => "PARLEY_OPENAI_BASE_URL",
            Self::Anthropic => "PARLEY_ANTHROPIC_BASE_URL",
            Self::Google => "PARLEY_GOOGLE_BASE_URL",
            Self::AiPipe => "PARLEY_AIPIPE_BASE_URL",
        }
    }

    /// Request/response shape for this provider.
    pub fn wire(self) -> &'static dyn WireFormat {
        match self {
            Self::OpenAi | Self::AiPipe => &OpenAiChatFormat,
            Self::Anthropic => &AnthropicMessagesFormat,
            Self::Google => &GeminiFormat,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| ParleyError::UnknownProvider(s.to_string()))
    }
}

/// Everything the loop needs to talk to one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    pub id: ProviderId,
    pub base_url: String,
    pub auth: AuthScheme,
    pub supports_tools: bool,
}

impl ProviderEntry {
    /// Final request URL for a session.
    pub fn endpoint_url(&self, session: &SessionConfig) -> Result<Url> {
        let raw = match self.auth {
            AuthScheme::Bearer => self.base_url.clone(),
            AuthScheme::QueryKey => format!(
                "{}/{}:generateContent",
                self.base_url.trim_end_matches('/'),
                session.model
            ),
        };
        let mut url = Url::parse(&raw).map_err(|e| {
            ParleyError::Configuration(format!("invalid endpoint for {}: {e}", self.id))
        })?;
        if self.auth == AuthScheme::QueryKey {
            url.query_pairs_mut().append_pair("key", &session.api_key);
        }
        Ok(url)
    }

    pub fn wire(&self) -> &'static dyn WireFormat {
        self.id.wire()
    }
}

/// Provider lookup with optional endpoint overrides.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    overrides: HashMap<ProviderId, String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with overrides from `PARLEY_<PROVIDER>_BASE_URL`.
    pub fn from_env() -> Self {
        let mut registry = Self::new();
        for id in ProviderId::ALL {
            if let Ok(url) = std::env::var(id.endpoint_env()) {
                if !url.trim().is_empty() {
                    registry.set_endpoint(id, url.trim().to_string());
                }
            }
        }
        registry
    }

    pub fn set_endpoint(&mut self, id: ProviderId, url: String) {
        self.overrides.insert(id, url);
    }

    pub fn with_endpoint(mut self, id: ProviderId, url: impl Into<String>) -> Self {
        self.set_endpoint(id, url.into());
        self
    }

    /// Look up a provider by id or alias.
    pub fn resolve(&self, provider_id: &str) -> Result<ProviderEntry> {
        let id = ProviderId::parse(provider_id)
            .ok_or_else(|| ParleyError::UnknownProvider(provider_id.to_string()))?;
        Ok(self.entry(id))
    }

    pub fn entry(&self, id: ProviderId) -> ProviderEntry {
        ProviderEntry {
            id,
            base_url: self
                .overrides
                .get(&id)
                .cloned()
                .unwrap_or_else(|| id.default_endpoint().to_string()),
            auth: id.auth(),
            supports_tools: id.supports_tools(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_aliases() {
        let registry = ProviderRegistry::new();
        assert_eq!(registry.resolve("claude").unwrap().id, ProviderId::Anthropic);
        assert_eq!(registry.resolve("Gemini").unwrap().id, ProviderId::Google);
        assert_eq!(registry.resolve("openrouter").unwrap().id, ProviderId::AiPipe);
    }

    #[test]
    fn unknown_provider_fails() {
        let err = ProviderRegistry::new().resolve("cohere").unwrap_err();
        assert!(matches!(err, ParleyError::UnknownProvider(ref p) if p == "cohere"));
    }

    #[test]
    fn tool_capability_flags() {
        let registry = ProviderRegistry::new();
        assert!(registry.resolve("openai").unwrap().supports_tools);
        assert!(registry.resolve("aipipe").unwrap().supports_tools);
        assert!(!registry.resolve("anthropic").unwrap().supports_tools);
        assert!(!registry.resolve("google").unwrap().supports_tools);
    }

    #[test]
    fn google_endpoint_carries_model_and_key() {
        let entry = ProviderRegistry::new().entry(ProviderId::Google);
        let session = SessionConfig::for_provider(ProviderId::Google)
            .with_model("gemini-2.0-flash")
            .with_api_key("k&y");
        let url = entry.endpoint_url(&session).unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=k%26y"
        );
    }

    #[test]
    fn bearer_endpoint_is_used_verbatim() {
        let registry =
            ProviderRegistry::new().with_endpoint(ProviderId::OpenAi, "http://127.0.0.1:1/v1/chat");
        let session = SessionConfig::default().with_api_key("k");
        let url = registry.entry(ProviderId::OpenAi).endpoint_url(&session).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:1/v1/chat");
    }
}
