use serde::{Deserialize, Serialize};

/// Connection settings for the OpenAI-compatible model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the endpoint, e.g. `http://localhost:12434/engines/v1`.
    pub base_url: String,
    /// API key sent as a bearer token. Local runners usually ignore it.
    pub api_key: String,
}

impl LlmConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: "not-needed".to_string(),
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Read the endpoint settings from `OPENAI_BASE_URL` and
    /// `OPENAI_API_KEY`. Local model runners need no real key, so the key
    /// defaults to a placeholder.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or_default(),
            api_key: std::env::var("OPENAI_API_KEY")
                .unwrap_or_else(|_| "not-needed".to_string()),
        }
    }

    /// Full URL of the chat completions route.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
