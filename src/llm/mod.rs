pub mod config;
pub mod message;
pub mod openai;
pub mod provider;
pub mod sanitizer;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for easier access
pub use config::LlmConfig;
pub use message::{ChatMessage, ChatRole, ContentBlock, ContentPart, FunctionCall, MessageContent, ToolCall};
pub use openai::OpenAiProvider;
pub use provider::{
    get_provider, CompletionKind, CompletionProvider, CompletionRequest, CompletionResponse,
    LlmError, SanitizingProvider, ToolSpec, Usage,
};
pub use sanitizer::merge_consecutive_assistant;
