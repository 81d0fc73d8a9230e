//! Scripted completion provider shared by the crate's tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm::provider::{
    CompletionKind, CompletionProvider, CompletionRequest, CompletionResponse, LlmError, Usage,
};

/// Plays back a fixed sequence of responses and records every request.
pub(crate) struct ScriptedProvider {
    responses: Mutex<VecDeque<CompletionResponse>>,
    seen: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub(crate) fn new<I: IntoIterator<Item = CompletionResponse>>(responses: I) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Convenience for scripts that only answer with plain text messages.
    pub(crate) fn with_messages<I, S>(contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(contents.into_iter().map(|content| CompletionResponse {
            kind: CompletionKind::Message {
                content: content.into(),
            },
            usage: Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
            },
        }))
    }

    pub(crate) fn seen_requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn completion(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.seen.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::MalformedResponse("scripted responses exhausted".to_string()))
    }
}
