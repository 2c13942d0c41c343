//! LLM backend: an OpenAI-compatible chat-completions boundary, expressed as
//! a small async capability trait so tests can substitute a mock without a
//! running server (design §6.1).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `"system"`, `"user"`, or `"assistant"`.
    pub role: String,
    /// Message text.
    pub content: String,
}

/// A chat-completion request, matching the wire shape in design §6.1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Backend model identifier.
    pub model: String,
    /// Conversation so far, system prompt first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus sampling cutoff.
    pub top_p: f64,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Hard cap on generated tokens.
    pub max_tokens: u32,
    /// Always `false`: this boundary consumes the whole response, not an SSE stream.
    pub stream: bool,
    /// Per-token-id additive logit bias.
    pub logit_bias: HashMap<i64, f64>,
    /// Optional presence penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Optional frequency penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Optional repetition penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
}

/// A completed (non-streamed) chat response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text.
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct RawChoice {
    message: RawMessage,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RawCompletion {
    choices: Vec<RawChoice>,
}

/// Main generation backend, distinct from the Arbiter's lighter
/// [`crate::arbiter::JudgeLlm`] calls, which carry their own shorter retry budget.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Issue one completion request.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

/// HTTP-backed [`LlmClient`] talking to an OpenAI-compatible endpoint.
pub struct HttpLlmClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLlmClient {
    /// Build a client pointed at `endpoint`, with `timeout` applied per request.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, endpoint: endpoint.into() }
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::BackendUnavailable(format!("status {}", response.status())));
        }

        let body: RawCompletion =
            response.json().await.map_err(|e| Error::BackendMalformed(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::BackendMalformed("empty choices array".to_string()))?
            .message
            .content;

        Ok(CompletionResponse { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_without_optional_fields() {
        let request = CompletionRequest {
            model: "luna".to_string(),
            messages: vec![ChatMessage { role: "user".to_string(), content: "hi".to_string() }],
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_tokens: 100,
            stream: false,
            logit_bias: HashMap::new(),
            presence_penalty: None,
            frequency_penalty: None,
            repetition_penalty: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("presence_penalty"));
    }
}
