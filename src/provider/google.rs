//! Google Gemini `generateContent` wire format.
//!
//! The whole conversation is flattened into a single text part, and tool
//! calling is not wired for this provider.

use serde::Deserialize;
use serde_json::{json, Value};

use super::{NormalizedResponse, WireFormat, WireRequest};
use crate::error::{ParleyError, Result};

pub struct GeminiFormat;

impl WireFormat for GeminiFormat {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn build_body(&self, request: &WireRequest<'_>) -> Value {
        let text = request
            .turns
            .iter()
            .map(|t| t.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        json!({ "contents": [{ "parts": [{ "text": text }] }] })
    }

    fn normalize(&self, body: &Value) -> Result<NormalizedResponse> {
        let data = GeminiResponse::deserialize(body)
            .map_err(|e| ParleyError::malformed(self.name(), e.to_string()))?;
        let part = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .ok_or_else(|| ParleyError::malformed(self.name(), "no candidate parts in response"))?;
        Ok(NormalizedResponse::text(part.text.unwrap_or_default()))
    }
}

// Internal Gemini response types

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Turn;

    #[test]
    fn normalizes_first_candidate_part() {
        let body = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hola"}, {"text": "extra"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 3}
        });
        let out = GeminiFormat.normalize(&body).unwrap();
        assert_eq!(out.text, "Hola");
        assert!(out.tool_calls.is_empty());
    }

    #[test]
    fn missing_candidates_is_malformed() {
        assert!(GeminiFormat.normalize(&json!({"candidates": []})).is_err());
        assert!(GeminiFormat
            .normalize(&json!({"candidates": [{"content": {"parts": []}}]}))
            .is_err());
    }

    #[test]
    fn body_joins_turns_into_one_part() {
        let turns = [Turn::user("first"), Turn::assistant("second"), Turn::user("third")];
        let refs: Vec<&Turn> = turns.iter().collect();
        let body = GeminiFormat.build_body(&WireRequest {
            model: "gemini-2.0-flash",
            turns: &refs,
            tools: None,
            max_tokens: 1024,
        });
        assert_eq!(
            body,
            json!({"contents": [{"parts": [{"text": "first\nsecond\nthird"}]}]})
        );
    }
}
