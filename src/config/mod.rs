//! Session configuration and agent settings.
//!
//! Resolution order for the session:
//! 1. Explicit values set by the host (`SessionHandle::update`)
//! 2. `PARLEY_PROVIDER`, `PARLEY_MODEL`, `PARLEY_API_KEY`
//! 3. The provider's own key variable (`OPENAI_API_KEY`, ...)
//! 4. Built-in defaults (`openai`, the provider's default model)

pub mod file;

pub use file::FileSettings;

use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use bon::Builder;

use crate::conversation::ErrorTurnPolicy;
use crate::error::{ParleyError, Result};
use crate::provider::ProviderId;

/// Default cap on rounds per run.
pub const DEFAULT_MAX_ROUNDS: usize = 20;

/// Provider, credential and model for one session.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub provider: ProviderId,
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("provider", &self.provider)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("model", &self.model)
            .finish()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_provider(ProviderId::OpenAi)
    }
}

impl SessionConfig {
    /// Config for `provider` with its default model and no key.
    pub fn for_provider(provider: ProviderId) -> Self {
        Self {
            provider,
            api_key: String::new(),
            model: provider.default_model().to_string(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Load from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve a config through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = match lookup("PARLEY_PROVIDER").filter(|v| !v.trim().is_empty()) {
            Some(raw) => ProviderId::parse(raw.trim())
                .ok_or_else(|| ParleyError::UnknownProvider(raw.trim().to_string()))?,
            None => ProviderId::OpenAi,
        };

        let api_key = lookup("PARLEY_API_KEY")
            .or_else(|| lookup(provider.api_key_env()))
            .unwrap_or_default();
        let model = lookup("PARLEY_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        Ok(Self {
            provider,
            api_key: api_key.trim().to_string(),
            model,
        })
    }

    /// Whether a non-empty credential is present.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Apply a partial update. Unset fields keep their value.
    pub fn apply(&mut self, update: SessionConfigUpdate) {
        if let Some(provider) = update.provider {
            self.provider = provider;
        }
        if let Some(key) = update.api_key {
            self.api_key = key.trim().to_string();
        }
        if let Some(model) = update.model {
            self.model = model;
        }
    }
}

/// Partial session change coming from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfigUpdate {
    pub provider: Option<ProviderId>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// Shared, host-mutable session config.
///
/// The agent loop only ever reads [`SessionHandle::snapshot`] at the start of
/// a round, so updates never affect a round that is already in flight.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<SessionConfig>>,
}

impl SessionHandle {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Immutable copy of the current config.
    pub fn snapshot(&self) -> SessionConfig {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn update(&self, update: SessionConfigUpdate) {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .apply(update);
    }
}

/// Knobs for the agent loop.
#[derive(Debug, Clone, Builder)]
pub struct AgentSettings {
    /// Upper bound on request rounds per run.
    #[builder(default = DEFAULT_MAX_ROUNDS)]
    pub max_rounds: usize,
    #[builder(default)]
    pub error_turn_policy: ErrorTurnPolicy,
    /// Per-invocation limit for tool capabilities.
    #[builder(default = Duration::from_secs(10))]
    pub tool_timeout: Duration,
    /// `max_tokens` sent to the Anthropic messages endpoint, which requires it.
    #[builder(default = 1024)]
    pub anthropic_max_tokens: u32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AgentSettings {
    /// Reject settings no run can succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(ParleyError::Configuration(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_to_openai_without_key() {
        let config = SessionConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.provider, ProviderId::OpenAi);
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(!config.has_credentials());
    }

    #[test]
    fn provider_specific_key_is_used() {
        let config = SessionConfig::from_lookup(lookup_from(&[
            ("PARLEY_PROVIDER", "gemini"),
            ("GOOGLE_API_KEY", "g-key"),
        ]))
        .unwrap();
        assert_eq!(config.provider, ProviderId::Google);
        assert_eq!(config.api_key, "g-key");
    }

    #[test]
    fn explicit_key_takes_precedence() {
        let config = SessionConfig::from_lookup(lookup_from(&[
            ("PARLEY_API_KEY", "explicit"),
            ("OPENAI_API_KEY", "env"),
            ("PARLEY_MODEL", "gpt-4.1"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "explicit");
        assert_eq!(config.model, "gpt-4.1");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = SessionConfig::from_lookup(lookup_from(&[("PARLEY_PROVIDER", "cohere")]))
            .unwrap_err();
        assert!(matches!(err, ParleyError::UnknownProvider(ref p) if p == "cohere"));
    }

    #[test]
    fn debug_redacts_key() {
        let config = SessionConfig::default().with_api_key("sk-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn snapshot_is_detached_from_later_updates() {
        let handle = SessionHandle::new(SessionConfig::default().with_api_key("k1"));
        let before = handle.snapshot();
        handle.update(SessionConfigUpdate {
            api_key: Some("k2".into()),
            model: Some("gpt-4.1".into()),
            ..Default::default()
        });
        assert_eq!(before.api_key, "k1");
        assert_eq!(handle.snapshot().api_key, "k2");
        assert_eq!(handle.snapshot().model, "gpt-4.1");
    }

    #[test]
    fn settings_builder_defaults() {
        let settings = AgentSettings::default();
        assert_eq!(settings.max_rounds, DEFAULT_MAX_ROUNDS);
        assert_eq!(settings.error_turn_policy, ErrorTurnPolicy::Exclude);

        let custom = AgentSettings::builder().max_rounds(3).build();
        assert_eq!(custom.max_rounds, 3);
    }

    #[test]
    fn zero_round_limit_is_rejected() {
        let err = AgentSettings::builder().max_rounds(0).build().validate().unwrap_err();
        assert!(matches!(err, ParleyError::Configuration(ref m) if m.contains("max_rounds")));
        assert!(AgentSettings::default().validate().is_ok());
    }
}
