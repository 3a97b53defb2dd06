//! OpenAI Chat Completions wire format (also used by OpenAI-compatible proxies).

use serde::Deserialize;
use serde_json::{json, Value};

use super::{NormalizedResponse, WireFormat, WireRequest};
use crate::error::{ParleyError, Result};
use crate::types::{Role, ToolCall, Turn};

pub struct OpenAiChatFormat;

impl WireFormat for OpenAiChatFormat {
    fn name(&self) -> &'static str {
        "openai-chat"
    }

    fn build_body(&self, request: &WireRequest<'_>) -> Value {
        let mut body = json!({
            "model": request.model,
            "messages": build_messages(request.turns),
        });

        if let Some(catalog) = request.tools {
            if !catalog.is_empty() {
                let tool_defs: Vec<Value> = catalog
                    .definitions()
                    .iter()
                    .map(|t| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.json_schema(),
                            }
                        })
                    })
                    .collect();
                if let Some(obj) = body.as_object_mut() {
                    obj.insert("tools".into(), tool_defs.into());
                }
            }
        }

        body
    }

    fn normalize(&self, body: &Value) -> Result<NormalizedResponse> {
        let data = OpenAiChatResponse::deserialize(body)
            .map_err(|e| ParleyError::malformed(self.name(), e.to_string()))?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ParleyError::malformed(self.name(), "no choices in response"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| tc.into_tool_call())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ParleyError::malformed(self.name(), "tool call without a name"))?;

        Ok(NormalizedResponse {
            text: choice.message.content.unwrap_or_default(),
            tool_calls,
        })
    }
}

/// Map turns to chat messages.
///
/// Tool turns that carry a call id are answered with `role: "tool"` messages,
/// and the calls are listed on the assistant message that precedes them (one
/// is synthesized when the round produced no assistant text).
fn build_messages(turns: &[&Turn]) -> Vec<Value> {
    let mut messages: Vec<Value> = Vec::with_capacity(turns.len());
    let mut open_assistant: Option<usize> = None;

    for turn in turns {
        match turn.role {
            Role::User => {
                messages.push(json!({ "role": "user", "content": turn.content }));
                open_assistant = None;
            }
            Role::Error => {
                messages.push(json!({ "role": "user", "content": format!("[error] {}", turn.content) }));
                open_assistant = None;
            }
            Role::Assistant => {
                messages.push(json!({ "role": "assistant", "content": turn.content }));
                open_assistant = Some(messages.len() - 1);
            }
            Role::Tool => {
                let Some((call, id)) = turn
                    .tool_call
                    .as_ref()
                    .and_then(|call| call.id.as_deref().map(|id| (call, id)))
                else {
                    messages.push(json!({ "role": "tool", "content": turn.content }));
                    continue;
                };

                let idx = match open_assistant {
                    Some(idx) => idx,
                    None => {
                        messages.push(json!({ "role": "assistant", "content": Value::Null }));
                        messages.len() - 1
                    }
                };
                open_assistant = Some(idx);

                let entry = json!({
                    "id": id,
                    "type": "function",
                    "function": {
                        "name": call.name,
                        "arguments": call.arguments.to_string(),
                    }
                });
                if let Some(obj) = messages[idx].as_object_mut() {
                    match obj.get_mut("tool_calls").and_then(Value::as_array_mut) {
                        Some(calls) => calls.push(entry),
                        None => {
                            obj.insert("tool_calls".into(), Value::Array(vec![entry]));
                        }
                    }
                }

                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": id,
                    "content": turn.content,
                }));
            }
        }
    }

    messages
}

// OpenAI API response types (internal)

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

/// Either the standard `{id, function: {name, arguments}}` shape or a flat
/// `{name, arguments}` entry.
#[derive(Deserialize)]
struct OpenAiToolCall {
    id: Option<String>,
    function: Option<OpenAiFunction>,
    name: Option<String>,
    arguments: Option<Value>,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    arguments: Option<Value>,
}

impl OpenAiToolCall {
    fn into_tool_call(self) -> Option<ToolCall> {
        let (name, arguments) = match self.function {
            Some(f) => (f.name, f.arguments),
            None => (self.name?, self.arguments),
        };
        Some(ToolCall {
            id: self.id,
            name,
            arguments: parse_arguments(arguments),
        })
    }
}

/// Arguments arrive as a JSON-encoded string; unparsable strings are kept raw.
fn parse_arguments(raw: Option<Value>) -> Value {
    match raw {
        None | Some(Value::Null) => json!({}),
        Some(Value::String(s)) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
        Some(other) => other,
    }
}
