//! Anthropic Messages wire format. Tool calling is not wired for this provider.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{NormalizedResponse, WireFormat, WireRequest};
use crate::error::{ParleyError, Result};
use crate::types::{Role, Turn};

pub struct AnthropicMessagesFormat;

impl WireFormat for AnthropicMessagesFormat {
    fn name(&self) -> &'static str {
        "anthropic-messages"
    }

    fn build_body(&self, request: &WireRequest<'_>) -> Value {
        let messages: Vec<Value> = request.turns.iter().map(|t| message_to_anthropic(t)).collect();
        json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "messages": messages,
        })
    }

    fn normalize(&self, body: &Value) -> Result<NormalizedResponse> {
        let data = AnthropicResponse::deserialize(body)
            .map_err(|e| ParleyError::malformed(self.name(), e.to_string()))?;
        let block = data
            .content
            .into_iter()
            .next()
            .ok_or_else(|| ParleyError::malformed(self.name(), "no content blocks in response"))?;
        Ok(NormalizedResponse::text(block.text.unwrap_or_default()))
    }
}

/// Only `user` and `assistant` roles exist on this API; tool and error turns
/// are passed as user text.
fn message_to_anthropic(turn: &Turn) -> Value {
    match turn.role {
        Role::Assistant => json!({ "role": "assistant", "content": turn.content }),
        Role::User => json!({ "role": "user", "content": turn.content }),
        Role::Tool => json!({ "role": "user", "content": turn.display_text() }),
        Role::Error => json!({ "role": "user", "content": format!("[error] {}", turn.content) }),
    }
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_first_text_block() {
        let body = json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Bonjour"},
                {"type": "text", "text": "ignored"}
            ],
            "stop_reason": "end_turn"
        });
        let out = AnthropicMessagesFormat.normalize(&body).unwrap();
        assert_eq!(out.text, "Bonjour");
        assert!(out.tool_calls.is_empty());
    }

    #[test]
    fn tool_use_blocks_are_not_reported() {
        let body = json!({"content": [
            {"type": "tool_use", "id": "t1", "name": "search", "input": {"query": "x"}}
        ]});
        let out = AnthropicMessagesFormat.normalize(&body).unwrap();
        assert_eq!(out, NormalizedResponse::default());
    }

    #[test]
    fn missing_content_is_malformed() {
        assert!(AnthropicMessagesFormat.normalize(&json!({"content": []})).is_err());
        assert!(AnthropicMessagesFormat.normalize(&json!({"error": "x"})).is_err());
    }

    #[test]
    fn body_has_model_max_tokens_and_no_tools() {
        let turns = [
            Turn::user("hi"),
            Turn::assistant("hey"),
            Turn::tool(ToolCall::new("search", json!({})), "r"),
        ];
        let refs: Vec<&Turn> = turns.iter().collect();
        let body = AnthropicMessagesFormat.build_body(&WireRequest {
            model: "claude-3-5-haiku-latest",
            turns: &refs,
            tools: None,
            max_tokens: 512,
        });
        assert_eq!(
            body,
            json!({
                "model": "claude-3-5-haiku-latest",
                "max_tokens": 512,
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hey"},
                    {"role": "user", "content": "[search] → r"}
                ]
            })
        );
    }
}
