// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A thin client for the OpenAI Chat Completions v1 subset the harness
//! needs, grounded on the sibling pack repo's
//! `mux::upstream::client::UpstreamClient` (a `reqwest::Client` wrapper,
//! `bearer_auth`, JSON in/out, `error_for_status`) generalized with the
//! retry/backoff policy spec.md §6 requires for the chat endpoint.

use crate::error::ModelError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Transport retries on connection errors / 5xx; never on 4xx (spec.md §6).
const RETRY_BACKOFFS: &[Duration] = &[
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

pub const CHAT_TIMEOUT: Duration = Duration::from_secs(120);
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
            tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
            tool_call_id: None,
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".into(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_function")]
    pub kind: String,
    pub function: ToolCallFunction,
}

fn default_function() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    /// JSON-encoded arguments, verbatim from the model — decoding
    /// robustness against double-encoding lives in the executor, not here.
    pub arguments: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

/// One completed turn: the assistant's text (empty string if none) and any
/// tool calls it made.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

/// The model-talking half of the harness tool loop, abstracted so tests can
/// inject a scripted backend instead of a real endpoint (teacher precedent:
/// `oj-adapters::agent::claude::ClaudeAgentAdapter` is likewise exercised in
/// tests through a narrow trait rather than a live process).
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run one completion turn. `tools: None` means tools are disabled for
    /// this call (used by the forced-summary and narration-recovery steps,
    /// spec.md §4.4).
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&Value>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<ChatTurn, ModelError>;
}

/// OpenAI-compatible chat client (`POST /v1/chat/completions`), plus the
/// `GET /api/tags` health probe spec.md §6/§4.7 describe.
pub struct ChatClient {
    base_url: String,
    model: String,
    client: Client,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: Client::builder()
                .timeout(CHAT_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// `GET /api/tags`, matching the configured model name exactly or as a
    /// prefix up to `:` (spec.md §6: `qwen2.5` matches `qwen2.5:latest`).
    pub async fn probe_healthy(&self) -> bool {
        let resp = match self
            .client
            .get(self.url("/api/tags"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(r) if r.status() == StatusCode::OK => r,
            _ => return false,
        };
        let Ok(body) = resp.json::<Value>().await else {
            return false;
        };
        let Some(models) = body.get("models").and_then(|m| m.as_array()) else {
            return false;
        };
        models.iter().any(|m| {
            m.get("name")
                .and_then(|n| n.as_str())
                .map(|n| model_name_matches(&self.model, n))
                .unwrap_or(false)
        })
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    /// Run one chat-completion turn with `messages` and `tools` (a raw
    /// JSON tool-definitions array, passed through verbatim). Retries up
    /// to 3 times with 1/2/4s backoff on transport errors and 5xx; 4xx is
    /// never retried (spec.md §6).
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&Value>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<ChatTurn, ModelError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "tools": tools.cloned().unwrap_or(Value::Array(Vec::new())),
            "stream": false,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let mut attempt = 0usize;
        loop {
            let result = self
                .client
                .post(self.url("/v1/chat/completions"))
                .json(&body)
                .send()
                .await;

            match result {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_server_error() {
                        if attempt < RETRY_BACKOFFS.len() {
                            tokio::time::sleep(RETRY_BACKOFFS[attempt]).await;
                            attempt += 1;
                            continue;
                        }
                        let body = resp.text().await.unwrap_or_default();
                        return Err(ModelError::Semantic {
                            status: status.as_u16(),
                            body,
                        });
                    }
                    if status.is_client_error() {
                        let body = resp.text().await.unwrap_or_default();
                        return Err(ModelError::Semantic {
                            status: status.as_u16(),
                            body,
                        });
                    }
                    let parsed: ChatResponse = resp.json().await?;
                    let choice = parsed.choices.into_iter().next().ok_or(ModelError::NoChoices)?;
                    return Ok(ChatTurn {
                        content: choice.message.content.unwrap_or_default(),
                        tool_calls: choice.message.tool_calls,
                    });
                }
                Err(e) => {
                    if attempt < RETRY_BACKOFFS.len() {
                        tokio::time::sleep(RETRY_BACKOFFS[attempt]).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(ModelError::Transport(e));
                }
            }
        }
    }
}

fn model_name_matches(configured: &str, candidate: &str) -> bool {
    if configured == candidate {
        return true;
    }
    candidate
        .split(':')
        .next()
        .map(|prefix| prefix == configured)
        .unwrap_or(false)
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{ChatBackend, ChatMessage, ChatTurn};
    use crate::error::ModelError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;

    /// Scripted [`ChatBackend`] for harness tests: returns queued turns in
    /// order and records every call's message list (teacher precedent:
    /// `mcab-adapters::FakePaneController`'s call-recording shape).
    #[derive(Default)]
    pub struct FakeChatBackend {
        turns: Mutex<std::collections::VecDeque<ChatTurn>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl FakeChatBackend {
        pub fn new(turns: Vec<ChatTurn>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }

        pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for FakeChatBackend {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _tools: Option<&Value>,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<ChatTurn, ModelError> {
            self.calls.lock().push(messages.to_vec());
            self.turns
                .lock()
                .pop_front()
                .ok_or(ModelError::NoChoices)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeChatBackend;

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
