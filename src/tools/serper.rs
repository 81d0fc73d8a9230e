//! Hosted search via the Serper API, plus a website scraper.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::web::{describe_failure, strip_html};
use crate::tools::{stringify_result, Tool};

const SERPER_URL: &str = "https://google.serper.dev/search";
const MAX_SCRAPE_CHARS: usize = 8000;

/// Google search through the hosted Serper API (`SERPER_API_KEY`).
pub struct SerperSearchTool {
    client: reqwest::Client,
    api_key: String,
}

impl SerperSearchTool {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

/// Render the organic results into the string handed back to the agent.
fn render_organic(query: &str, body: &Value) -> String {
    let Some(organic) = body.get("organic").and_then(Value::as_array) else {
        // Unknown response shape: give the agent the raw payload.
        return stringify_result(body);
    };
    if organic.is_empty() {
        return format!("No search results found for '{}'.", query);
    }
    let mut out = format!("Search results for '{}':\n", query);
    for (i, hit) in organic.iter().take(10).enumerate() {
        let title = hit.get("title").and_then(Value::as_str).unwrap_or("(untitled)");
        let link = hit.get("link").and_then(Value::as_str).unwrap_or("");
        let snippet = hit.get("snippet").and_then(Value::as_str).unwrap_or("");
        out.push_str(&format!("\n{}. {}\n   {}\n", i + 1, title, link));
        if !snippet.is_empty() {
            out.push_str(&format!("   {}\n", snippet));
        }
    }
    out
}

#[async_trait]
impl Tool for SerperSearchTool {
    fn name(&self) -> &str {
        "search_internet"
    }

    fn description(&self) -> &str {
        "Search the internet for current information about a topic. Returns titles, links and snippets of the top results."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "search_query": {
                    "type": "string",
                    "description": "The query to search for"
                }
            },
            "required": ["search_query"]
        })
    }

    async fn call(&self, args: Value) -> String {
        let Some(query) = args.get("search_query").and_then(Value::as_str) else {
            return "Missing required argument 'search_query'.".to_string();
        };
        let request = self
            .client
            .post(SERPER_URL)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({"q": query, "num": 10}));
        let response = match request.send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(err) => return describe_failure("Serper search", &err),
        };
        match response.json::<Value>().await {
            Ok(body) => render_organic(query, &body),
            Err(err) => describe_failure("Serper search", &err),
        }
    }
}

/// Fetch a page and return its readable text, like crewai's website scraper.
pub struct ScrapeWebsiteTool {
    client: reqwest::Client,
}

impl ScrapeWebsiteTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ScrapeWebsiteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ScrapeWebsiteTool {
    fn name(&self) -> &str {
        "scrape_website"
    }

    fn description(&self) -> &str {
        "Read the textual content of a website given its URL."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "website_url": {
                    "type": "string",
                    "description": "The URL of the website to read"
                }
            },
            "required": ["website_url"]
        })
    }

    async fn call(&self, args: Value) -> String {
        let Some(url) = args.get("website_url").and_then(Value::as_str) else {
            return "Missing required argument 'website_url'.".to_string();
        };
        let response = match self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response,
            Err(err) => return describe_failure("Website scrape", &err),
        };
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return describe_failure("Website scrape", &err),
        };
        let mut text = strip_html(&body);
        if text.len() > MAX_SCRAPE_CHARS {
            let mut cut = MAX_SCRAPE_CHARS;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
            text.push_str("\n[content truncated]");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_organic_results() {
        let body = json!({
            "organic": [
                {"title": "Rust", "link": "https://rust-lang.org", "snippet": "A language."},
                {"title": "Crates", "link": "https://crates.io"}
            ]
        });
        let text = render_organic("rust", &body);
        assert!(text.contains("1. Rust"));
        assert!(text.contains("https://rust-lang.org"));
        assert!(text.contains("A language."));
        assert!(text.contains("2. Crates"));
    }

    #[test]
    fn test_render_organic_unknown_shape_falls_back_to_json() {
        let body = json!({"message": "unexpected"});
        let text = render_organic("rust", &body);
        assert!(text.contains("unexpected"));
    }

    #[test]
    fn test_render_organic_empty() {
        let body = json!({"organic": []});
        assert_eq!(
            render_organic("rust", &body),
            "No search results found for 'rust'."
        );
    }
}
