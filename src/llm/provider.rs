use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::llm::config::LlmConfig;
use crate::llm::message::{ChatMessage, ToolCall};
use crate::llm::openai::OpenAiProvider;
use crate::llm::sanitizer::merge_consecutive_assistant;

/// A tool definition advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema describing the tool arguments.
    pub parameters: Value,
}

/// One outbound completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub tools: Vec<ToolSpec>,
}

impl CompletionRequest {
    pub fn new(
        messages: Vec<ChatMessage>,
        model: String,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
        tools: Vec<ToolSpec>,
    ) -> Self {
        Self {
            messages,
            model,
            temperature,
            max_tokens,
            tools,
        }
    }
}

/// Token usage reported by the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }

    pub fn add(&mut self, other: Usage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }
}

/// What the model answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionKind {
    Message { content: String },
    ToolCalls { tool_calls: Vec<ToolCall> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub kind: CompletionKind,
    pub usage: Usage,
}

/// Errors from the completion client.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("rate limited by the model endpoint: {0}")]
    RateLimited(String),
    #[error("model endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("network error talking to the model endpoint: {0}")]
    Network(String),
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// The completion client seam. Agents only ever see this trait, so the
/// concrete HTTP client can be swapped for a scripted one in tests.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn completion(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Decorator that sanitizes the transcript of every request before
/// delegating to the wrapped provider.
///
/// This replaces patching a global completion entry point: interception is
/// part of the client value itself, so it composes explicitly and wrapping
/// twice merely re-applies an idempotent transform.
pub struct SanitizingProvider<P> {
    inner: P,
}

impl<P: CompletionProvider> SanitizingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: CompletionProvider> CompletionProvider for SanitizingProvider<P> {
    async fn completion(
        &self,
        mut request: CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        request.messages = merge_consecutive_assistant(&request.messages);
        self.inner.completion(request).await
    }
}

/// Build the completion provider for the given endpoint configuration.
///
/// The returned provider is already wrapped in [`SanitizingProvider`], so
/// every outbound call made through it satisfies the adjacency invariant.
pub fn get_provider(config: LlmConfig) -> Arc<dyn CompletionProvider> {
    Arc::new(SanitizingProvider::new(OpenAiProvider::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::{ChatRole, MessageContent};
    use crate::llm::testing::ScriptedProvider;

    #[tokio::test]
    async fn test_sanitizing_provider_merges_before_delegating() {
        let inner = ScriptedProvider::with_messages(["fine"]);
        let seen = inner.seen_requests();
        let provider = SanitizingProvider::new(inner);

        let request = CompletionRequest::new(
            vec![
                ChatMessage::user("hi"),
                ChatMessage::assistant("a"),
                ChatMessage::assistant("b"),
            ],
            "test-model".to_string(),
            None,
            None,
            vec![],
        );
        provider.completion(request).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let messages = &seen[0].messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(
            messages[1].content,
            Some(MessageContent::Text("a\n\nb".to_string()))
        );
    }

    #[tokio::test]
    async fn test_double_wrapping_is_harmless() {
        let inner = ScriptedProvider::with_messages(["fine"]);
        let seen = inner.seen_requests();
        let provider = SanitizingProvider::new(SanitizingProvider::new(inner));

        let request = CompletionRequest::new(
            vec![ChatMessage::assistant("a"), ChatMessage::assistant("b")],
            "test-model".to_string(),
            None,
            None,
            vec![],
        );
        provider.completion(request).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].messages.len(), 1);
        assert_eq!(
            seen[0].messages[0].content,
            Some(MessageContent::Text("a\n\nb".to_string()))
        );
    }
}
