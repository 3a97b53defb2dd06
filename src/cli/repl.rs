//! Line commands for the interactive chat.

use crate::config::SessionConfigUpdate;
use crate::error::{ParleyError, Result};
use crate::provider::ProviderId;

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Message(String),
    Configure(SessionConfigUpdate),
    Reset,
    Quit,
    Help,
    Empty,
}

pub const HELP: &str = "\
/provider <id>   switch provider (openai, anthropic, google, aipipe)
/model <name>    switch model
/key <api-key>   set the API key
/reset           start a new conversation
/quit            exit";

/// A provider switch without an explicit key takes the new provider's key
/// from `lookup`, or clears the key so the previous vendor's is never sent.
pub fn resolve_provider_key(
    update: &mut SessionConfigUpdate,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let (Some(provider), None) = (update.provider, &update.api_key) {
        update.api_key = Some(lookup(provider.api_key_env()).unwrap_or_default());
    }
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Message(line.to_string()));
        };

        let (cmd, arg) = match rest.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (rest, ""),
        };

        match (cmd, arg) {
            ("quit" | "exit", _) => Ok(Self::Quit),
            ("reset", _) => Ok(Self::Reset),
            ("help", _) => Ok(Self::Help),
            ("provider", id) if !id.is_empty() => {
                let provider: ProviderId = id.parse()?;
                Ok(Self::Configure(SessionConfigUpdate {
                    provider: Some(provider),
                    model: Some(provider.default_model().to_string()),
                    ..Default::default()
                }))
            }
            ("model", model) if !model.is_empty() => Ok(Self::Configure(SessionConfigUpdate {
                model: Some(model.to_string()),
                ..Default::default()
            })),
            ("key", key) if !key.is_empty() => Ok(Self::Configure(SessionConfigUpdate {
                api_key: Some(key.to_string()),
                ..Default::default()
            })),
            _ => Err(ParleyError::Configuration(format!(
                "unrecognized command '/{rest}' (try /help)"
            ))),
        }
    }
}
