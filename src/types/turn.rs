//! Conversation turns and tool calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
    Error,
}

/// One entry in the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// For tool turns: the call this turn answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Turn {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call: None,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Create a tool turn holding the result of `call`.
    pub fn tool(call: ToolCall, result: impl Into<String>) -> Self {
        Self {
            tool_call: Some(call),
            ..Self::new(Role::Tool, result)
        }
    }

    /// Create an error turn.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Role::Error, message)
    }

    /// Name of the tool a tool turn answers.
    pub fn tool_name(&self) -> Option<&str> {
        self.tool_call.as_ref().map(|call| call.name.as_str())
    }

    /// Text shown to the user. Tool turns render as `[<tool>] → <result>`.
    pub fn display_text(&self) -> String {
        match (self.role, self.tool_name()) {
            (Role::Tool, Some(name)) => format!("[{name}] → {}", self.content),
            _ => self.content.clone(),
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Provider-assigned call id, when the wire format has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_turn_display_uses_arrow_format() {
        let turn = Turn::tool(ToolCall::new("search", json!({"query": "x"})), "found");
        assert_eq!(turn.display_text(), "[search] → found");
        assert_eq!(turn.content, "found");
    }

    #[test]
    fn role_round_trips_through_strum() {
        assert_eq!(Role::Error.to_string(), "error");
        assert_eq!("tool".parse::<Role>().unwrap(), Role::Tool);
    }
}
