use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::llm::config::LlmConfig;
use crate::llm::message::ToolCall;
use crate::llm::provider::{
    CompletionKind, CompletionProvider, CompletionRequest, CompletionResponse, LlmError, Usage,
};

/// Non-streaming client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiProvider {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

/// Build the JSON body for one completion call.
fn build_body(request: &CompletionRequest) -> Value {
    let mut body = json!({
        "model": request.model,
        "messages": request.messages,
        "stream": false,
    });
    if let Some(temperature) = request.temperature {
        body["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    if !request.tools.is_empty() {
        let tools: Vec<Value> = request
            .tools
            .iter()
            .map(|tool| json!({"type": "function", "function": tool}))
            .collect();
        body["tools"] = Value::Array(tools);
    }
    body
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn completion(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&build_body(&request))
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || body.to_lowercase().contains("rate limit")
            {
                return Err(LlmError::RateLimited(body));
            }
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
        let usage = wire.usage.unwrap_or_default();
        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse("response has no choices".to_string()))?;

        let kind = match choice.message.tool_calls {
            Some(tool_calls) if !tool_calls.is_empty() => CompletionKind::ToolCalls { tool_calls },
            _ => CompletionKind::Message {
                content: choice.message.content.unwrap_or_default(),
            },
        };
        Ok(CompletionResponse { kind, usage })
    }
}
