pub mod mcp;
pub mod serper;
pub mod web;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::llm::ToolSpec;

/// A capability the agents can invoke through model tool calls.
///
/// `call` never fails outward: implementations turn every failure into a
/// descriptive string so the agent receives textual feedback instead of the
/// run aborting mid-task.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the tool arguments.
    fn parameters(&self) -> Value;
    async fn call(&self, args: Value) -> String;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Errors from tool transport plumbing, converted to strings at the
/// [`Tool::call`] boundary.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool server error: {0}")]
    Server(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed tool response: {0}")]
    MalformedResponse(String),
}

/// Coerce a structured tool result to a string.
///
/// Gemma-family chat templates break on non-string tool results, so anything
/// that is not already a string becomes pretty-printed JSON.
pub fn stringify_result(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Which tool backend the crew runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolProvider {
    /// Tools served by an MCP server reachable over HTTP.
    Mcp { server_url: String },
    /// Hosted Serper search plus a website scraper.
    Serper { api_key: String },
    /// Keyless fallback: DuckDuckGo search and plain web fetch.
    Local,
}

impl ToolProvider {
    /// Reproduce the original selection order for the CLI path:
    /// `MCP_SERVER_URL` wins, then `SERPER_API_KEY`, then the local
    /// fallback. Library callers pass the variant explicitly instead.
    pub fn from_env() -> Self {
        if let Ok(server_url) = std::env::var("MCP_SERVER_URL") {
            if !server_url.is_empty() {
                return Self::Mcp { server_url };
            }
        }
        if let Ok(api_key) = std::env::var("SERPER_API_KEY") {
            if !api_key.is_empty() {
                return Self::Serper { api_key };
            }
        }
        Self::Local
    }
}

/// Build the tool set for the chosen backend.
pub async fn get_tools(provider: &ToolProvider) -> anyhow::Result<Vec<Arc<dyn Tool>>> {
    match provider {
        ToolProvider::Mcp { server_url } => {
            let toolset = mcp::McpToolset::connect(server_url).await?;
            let tools = toolset.tools().await?;
            println!(
                "Available MCP tools {:?}",
                tools.iter().map(|t| t.name().to_string()).collect::<Vec<_>>()
            );
            Ok(tools)
        }
        ToolProvider::Serper { api_key } => Ok(vec![
            Arc::new(serper::SerperSearchTool::new(api_key.clone())),
            Arc::new(serper::ScrapeWebsiteTool::new()),
        ]),
        ToolProvider::Local => Ok(vec![
            Arc::new(web::DuckDuckGoSearchTool::new()),
            Arc::new(web::WebFetchTool::new()),
        ]),
    }
}
