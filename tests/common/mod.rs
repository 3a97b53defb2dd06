//! Shared test helpers and a scripted transport.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Url;
use serde_json::{json, Value};

use parley::agent::{AgentEvent, EventSink};
use parley::error::{ParleyError, Result};
use parley::provider::{ProviderId, Transport};

/// One request seen by the transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub provider: ProviderId,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Transport that replays queued responses and records every request.
///
/// When the queue runs dry the request never completes.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn queue(&self, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    pub fn queue_error(&self, err: ParleyError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(
        &self,
        provider: ProviderId,
        url: Url,
        headers: HeaderMap,
        body: &Value,
    ) -> Result<Value> {
        self.requests.lock().unwrap().push(RecordedRequest {
            provider,
            url,
            headers,
            body: body.clone(),
        });
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => std::future::pending().await,
        }
    }
}

/// Event sink that collects everything it receives.
pub fn collecting_sink() -> (EventSink, Arc<Mutex<Vec<AgentEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let captured = events.clone();
    let sink: EventSink = Arc::new(move |event| captured.lock().unwrap().push(event));
    (sink, events)
}

/// OpenAI chat completion with plain text.
pub fn openai_text(text: &str) -> Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": text } }]
    })
}

/// OpenAI chat completion requesting the given `(id, name, arguments)` calls.
pub fn openai_tool_calls(calls: &[(&str, &str, Value)]) -> Value {
    let tool_calls: Vec<Value> = calls
        .iter()
        .map(|(id, name, args)| {
            json!({
                "id": id,
                "type": "function",
                "function": { "name": name, "arguments": args.to_string() }
            })
        })
        .collect();
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": null, "tool_calls": tool_calls }
        }]
    })
}

pub fn anthropic_text(text: &str) -> Value {
    json!({ "content": [{ "type": "text", "text": text }] })
}

pub fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
}
