//! Optional TOML settings file (`~/.parley/config.toml`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AgentSettings, SessionConfig};
use crate::conversation::ErrorTurnPolicy;
use crate::error::{ParleyError, Result};
use crate::provider::{ProviderId, ProviderRegistry};

/// Settings read from disk. Every field is optional.
///
/// ```toml
/// provider = "anthropic"
/// model = "claude-3-5-haiku-latest"
/// max_rounds = 8
/// error_turns = "include"
///
/// [endpoints]
/// openai = "http://localhost:8080/v1/chat/completions"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_turns: Option<ErrorTurnPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_timeout_ms: Option<u64>,
    /// Endpoint overrides keyed by provider id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub endpoints: BTreeMap<String, String>,
}

impl FileSettings {
    /// Default location of the settings file.
    pub fn default_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".parley"))
            .unwrap_or_else(|| PathBuf::from(".parley"))
            .join("config.toml")
    }

    /// Read settings from `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Self::parse(&raw).map(Some)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|e| ParleyError::Configuration(format!("invalid settings file: {e}")))
    }

    /// Apply provider and model. The API key never comes from this file.
    pub fn apply_to_session(&self, session: &mut SessionConfig) -> Result<()> {
        if let Some(raw) = &self.provider {
            let provider = ProviderId::parse(raw)
                .ok_or_else(|| ParleyError::UnknownProvider(raw.clone()))?;
            if provider != session.provider {
                session.provider = provider;
                session.model = provider.default_model().to_string();
            }
        }
        if let Some(model) = &self.model {
            session.model = model.clone();
        }
        Ok(())
    }

    pub fn apply_to_settings(&self, settings: &mut AgentSettings) -> Result<()> {
        if let Some(max_rounds) = self.max_rounds {
            if max_rounds == 0 {
                return Err(ParleyError::Configuration(
                    "invalid settings file: max_rounds must be at least 1".to_string(),
                ));
            }
            settings.max_rounds = max_rounds;
        }
        if let Some(policy) = self.error_turns {
            settings.error_turn_policy = policy;
        }
        if let Some(ms) = self.tool_timeout_ms {
            settings.tool_timeout = std::time::Duration::from_millis(ms);
        }
        Ok(())
    }

    pub fn apply_to_registry(&self, registry: &mut ProviderRegistry) -> Result<()> {
        for (raw, url) in &self.endpoints {
            let provider = ProviderId::parse(raw)
                .ok_or_else(|| ParleyError::UnknownProvider(raw.clone()))?;
            registry.set_endpoint(provider, url.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_ROUNDS;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let loaded = FileSettings::load(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn file_settings_apply_to_session_and_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
provider = "claude"
max_rounds = 4
error_turns = "include"

[endpoints]
anthropic = "http://localhost:9999/v1/messages"
"#,
        )
        .unwrap();

        let file = FileSettings::load(&path).unwrap().unwrap();

        let mut session = SessionConfig::default();
        file.apply_to_session(&mut session).unwrap();
        assert_eq!(session.provider, ProviderId::Anthropic);
        assert_eq!(session.model, ProviderId::Anthropic.default_model());

        let mut settings = AgentSettings::default();
        file.apply_to_settings(&mut settings).unwrap();
        assert_eq!(settings.max_rounds, 4);
        assert_eq!(settings.error_turn_policy, ErrorTurnPolicy::Include);

        let mut registry = ProviderRegistry::new();
        file.apply_to_registry(&mut registry).unwrap();
        assert_eq!(
            registry.resolve("anthropic").unwrap().base_url,
            "http://localhost:9999/v1/messages"
        );
    }

    #[test]
    fn zero_max_rounds_in_file_is_rejected() {
        let file = FileSettings::parse("max_rounds = 0").unwrap();
        let mut settings = AgentSettings::default();
        let err = file.apply_to_settings(&mut settings).unwrap_err();
        assert!(matches!(err, ParleyError::Configuration(ref m) if m.contains("max_rounds")));
        assert_eq!(settings.max_rounds, DEFAULT_MAX_ROUNDS);
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        let err = FileSettings::parse("provider = [").unwrap_err();
        assert!(matches!(err, ParleyError::Configuration(_)));
    }
}
