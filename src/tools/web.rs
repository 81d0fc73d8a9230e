//! Keyless fallback tools: DuckDuckGo HTML search and plain page fetch.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tools::Tool;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; marketing-posts/0.1)";
const MAX_FETCH_CHARS: usize = 8000;
const MAX_SEARCH_RESULTS: usize = 5;

/// Turn a transport failure into the string the agent will read.
pub(crate) fn describe_failure(what: &str, err: &reqwest::Error) -> String {
    let text = err.to_string();
    if err.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS)
        || text.to_lowercase().contains("rate limit")
    {
        format!("{} failed: rate limited, try again later.", what)
    } else if let Some(status) = err.status() {
        format!("{} failed with HTTP status {}.", what, status)
    } else {
        format!("{} failed with a network error: {}.", what, text)
    }
}

/// Reduce an HTML document to readable text: script/style blocks removed,
/// tags stripped, common entities decoded, whitespace collapsed.
pub(crate) fn strip_html(html: &str) -> String {
    let without_blocks = remove_block(&remove_block(html, "script"), "style");
    let mut text = String::with_capacity(without_blocks.len());
    let mut in_tag = false;
    for ch in without_blocks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    let decoded = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Case-sensitive on purpose: lowercasing shifts byte offsets for non-ASCII
// documents, and real-world pages use lowercase tags.
fn remove_block(html: &str, tag: &str) -> String {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find(&open) {
        out.push_str(&rest[..start]);
        match rest[start..].find(&close) {
            Some(end) => rest = &rest[start + end + close.len()..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, PartialEq)]
pub(crate) struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

fn attr_value<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!("{}=\"", name);
    let start = attrs.find(&marker)? + marker.len();
    let end = attrs[start..].find('"')?;
    Some(&attrs[start..start + end])
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// DuckDuckGo redirect links carry the target in the `uddg` query parameter.
fn resolve_href(href: &str) -> String {
    if let Some(start) = href.find("uddg=") {
        let encoded = &href[start + 5..];
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        return percent_decode(encoded);
    }
    href.to_string()
}

/// Pull result titles, links and snippets out of the DuckDuckGo HTML page.
pub(crate) fn extract_search_hits(html: &str, limit: usize) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find("<a ") {
        let tag = &rest[start..];
        let Some(attr_end) = tag.find('>') else { break };
        let attrs = &tag[..attr_end];
        let body = &tag[attr_end + 1..];
        let close = body.find("</a>").unwrap_or(body.len());

        if attrs.contains("result__a") {
            if hits.len() == limit {
                break;
            }
            hits.push(SearchHit {
                title: strip_html(&body[..close]),
                url: resolve_href(attr_value(attrs, "href").unwrap_or_default()),
                snippet: String::new(),
            });
        } else if attrs.contains("result__snippet") {
            if let Some(hit) = hits.last_mut() {
                if hit.snippet.is_empty() {
                    hit.snippet = strip_html(&body[..close]);
                }
            }
        }
        rest = &body[close..];
    }
    hits
}

fn render_hits(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No search results found for '{}'.", query);
    }
    let mut out = format!("Search results for '{}':\n", query);
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n   {}\n", i + 1, hit.title, hit.url));
        if !hit.snippet.is_empty() {
            out.push_str(&format!("   {}\n", hit.snippet));
        }
    }
    out
}

/// Web search without an API key, via the DuckDuckGo HTML endpoint.
pub struct DuckDuckGoSearchTool {
    client: reqwest::Client,
}

impl DuckDuckGoSearchTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for DuckDuckGoSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DuckDuckGoSearchTool {
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
            .get("https://html.duckduckgo.com/html/")
            .query(&[("q", query)])
            .header(reqwest::header::USER_AGENT, USER_AGENT);
        let response = match request.send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(err) => return describe_failure("Web search", &err),
        };
        match response.text().await {
            Ok(html) => render_hits(query, &extract_search_hits(&html, MAX_SEARCH_RESULTS)),
            Err(err) => describe_failure("Web search", &err),
        }
    }
}

/// Fetch a web page and return its readable text.
pub struct WebFetchTool {
    client: reqwest::Client,
}

impl WebFetchTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebFetchTool {
    fn name(&self) -> &str {
        "fetch_website"
    }

    fn description(&self) -> &str {
        "Fetch a website by URL and return its textual content."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the page to fetch"
                }
            },
            "required": ["url"]
        })
    }

    async fn call(&self, args: Value) -> String {
        let Some(url) = args.get("url").and_then(Value::as_str) else {
            return "Missing required argument 'url'.".to_string();
        };
        let request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT);
        let response = match request.send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => response,
            Err(err) => return describe_failure("Web fetch", &err),
        };
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return describe_failure("Web fetch", &err),
        };
        let mut text = strip_html(&body);
        if text.len() > MAX_FETCH_CHARS {
            let mut cut = MAX_FETCH_CHARS;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
            text.push_str("\n[content truncated]");
        }
        text
    }
}
