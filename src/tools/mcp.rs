//! Tools served by an MCP server reachable over HTTP.
//!
//! The toolset speaks JSON-RPC against the server URL: one `initialize`
//! handshake at connect time, then `tools/list` to discover the remote tools
//! and `tools/call` per invocation. Every remote tool is surfaced as a
//! [`Tool`], with its result coerced to a string.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::{stringify_result, Tool, ToolError};

const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

pub struct McpToolset {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicI64,
}

impl McpToolset {
    /// Connect to the server and run the initialize handshake.
    pub async fn connect(server_url: &str) -> Result<Arc<Self>, ToolError> {
        let toolset = Arc::new(Self {
            client: reqwest::Client::new(),
            endpoint: server_url.to_string(),
            next_id: AtomicI64::new(1),
        });
        toolset
            .request(
                "initialize",
                json!({
                    "protocolVersion": MCP_PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": "marketing-posts",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            )
            .await?;
        toolset.notify("notifications/initialized").await?;
        Ok(toolset)
    }

    async fn post(&self, body: Value) -> Result<Value, ToolError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            // Notifications are allowed to come back empty.
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ToolError::MalformedResponse(format!("invalid JSON-RPC reply: {}", e)))
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ToolError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .post(json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": method,
                "params": params
            }))
            .await?;
        if let Some(error) = reply.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("mcp error");
            return Err(ToolError::Server(format!("{} failed: {}", method, message)));
        }
        Ok(reply.get("result").cloned().unwrap_or(Value::Null))
    }

    async fn notify(&self, method: &str) -> Result<(), ToolError> {
        self.post(json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": {}
        }))
        .await?;
        Ok(())
    }

    /// Discover the remote tools and wrap each as a [`Tool`].
    pub async fn tools(self: &Arc<Self>) -> Result<Vec<Arc<dyn Tool>>, ToolError> {
        let result = self.request("tools/list", json!({})).await?;
        let tools = parse_tool_list(&result)?;
        Ok(tools
            .into_iter()
            .map(|(name, description, parameters)| {
                Arc::new(McpTool {
                    server: Arc::clone(self),
                    name,
                    description,
                    parameters,
                }) as Arc<dyn Tool>
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        let result = self
            .request("tools/call", json!({"name": name, "arguments": arguments}))
            .await?;
        Ok(extract_text(&result))
    }
}

/// Read `result.tools[]` into (name, description, input schema) triples.
fn parse_tool_list(result: &Value) -> Result<Vec<(String, String, Value)>, ToolError> {
    let tools = result
        .get("tools")
        .and_then(Value::as_array)
        .ok_or_else(|| ToolError::MalformedResponse("tools/list missing tools array".to_string()))?;
    let mut parsed = Vec::with_capacity(tools.len());
    for tool in tools {
        let Some(name) = tool.get("name").and_then(Value::as_str) else {
            return Err(ToolError::MalformedResponse(
                "tools/list entry missing name".to_string(),
            ));
        };
        let description = tool
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let parameters = tool
            .get("inputSchema")
            .cloned()
            .unwrap_or_else(|| json!({"type": "object", "properties": {}}));
        parsed.push((name.to_string(), description, parameters));
    }
    Ok(parsed)
}

/// Pull the text payload out of a `tools/call` result, falling back to the
/// whole result as pretty JSON when the server returned something else.
fn extract_text(result: &Value) -> String {
    result
        .get("content")
        .and_then(|content| content.get(0))
        .and_then(|first| first.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| stringify_result(result))
}

/// One remote tool, bound to its toolset connection.
struct McpTool {
    server: Arc<McpToolset>,
    name: String,
    description: String,
    parameters: Value,
}

#[async_trait]
impl Tool for McpTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> Value {
        self.parameters.clone()
    }

    async fn call(&self, args: Value) -> String {
        match self.server.call_tool(&self.name, args).await {
            Ok(result) => result,
            Err(err) => format!("Tool '{}' failed: {}.", self.name, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_list() {
        let result = json!({
            "tools": [
                {
                    "name": "web_search",
                    "description": "Searches the web.",
                    "inputSchema": {"type": "object", "properties": {"query": {"type": "string"}}}
                },
                {"name": "bare_tool"}
            ]
        });
        let tools = parse_tool_list(&result).unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].0, "web_search");
        assert_eq!(tools[0].2["properties"]["query"]["type"], json!("string"));
        assert_eq!(tools[1].1, "");
        assert_eq!(tools[1].2["type"], json!("object"));
    }

    #[test]
    fn test_parse_tool_list_rejects_missing_array() {
        assert!(parse_tool_list(&json!({})).is_err());
    }

    #[test]
    fn test_extract_text_prefers_first_text_block() {
        let result = json!({
            "content": [
                {"type": "text", "text": "tool output"},
                {"type": "text", "text": "ignored"}
            ]
        });
        assert_eq!(extract_text(&result), "tool output");
    }

    #[test]
    fn test_extract_text_stringifies_other_shapes() {
        let result = json!({"content": [{"type": "json", "data": {"a": 1}}]});
        let text = extract_text(&result);
        assert!(text.contains("\"a\": 1"));
    }
}
