use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a chat transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// Message content as it appears on the wire: either a plain string or an
/// ordered list of content parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One element of multi-part content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text(String),
    Block(ContentBlock),
}

/// A typed content block. Only `type == "text"` carries a payload we read;
/// everything else is kept opaque in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ContentBlock {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Arguments as a JSON-encoded string, as delivered by the endpoint.
    pub arguments: String,
}

/// One entry of a chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn new(
        role: ChatRole,
        content: Option<MessageContent>,
        tool_calls: Option<Vec<ToolCall>>,
        tool_call_id: Option<String>,
    ) -> Self {
        Self {
            role,
            content,
            tool_calls,
            tool_call_id,
        }
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(ChatRole::System, Some(MessageContent::Text(content.into())), None, None)
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(ChatRole::User, Some(MessageContent::Text(content.into())), None, None)
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self::new(ChatRole::Assistant, Some(MessageContent::Text(content.into())), None, None)
    }

    /// An assistant message that carries tool calls instead of text.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self::new(ChatRole::Assistant, None, Some(tool_calls), None)
    }

    /// A tool result message answering the tool call with the given id.
    pub fn tool<S: Into<String>>(content: S, tool_call_id: String) -> Self {
        Self::new(
            ChatRole::Tool,
            Some(MessageContent::Text(content.into())),
            None,
            Some(tool_call_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_roundtrip() {
        let msg = ChatMessage::user("hello");
        let encoded = serde_json::to_value(&msg).unwrap();
        assert_eq!(encoded, json!({"role": "user", "content": "hello"}));
        let decoded: ChatMessage = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_multi_part_content_roundtrip() {
        let raw = json!({
            "role": "assistant",
            "content": [
                {"type": "text", "text": "x"},
                {"type": "image", "url": "http://example.com/a.png"},
                "bare string part"
            ]
        });
        let msg: ChatMessage = serde_json::from_value(raw.clone()).unwrap();
        let Some(MessageContent::Parts(parts)) = &msg.content else {
            panic!("expected multi-part content");
        };
        assert_eq!(parts.len(), 3);
        match &parts[0] {
            ContentPart::Block(block) => {
                assert_eq!(block.kind, "text");
                assert_eq!(block.text.as_deref(), Some("x"));
            }
            other => panic!("unexpected part: {:?}", other),
        }
        match &parts[1] {
            ContentPart::Block(block) => {
                assert_eq!(block.kind, "image");
                assert!(block.text.is_none());
                assert_eq!(block.extra["url"], json!("http://example.com/a.png"));
            }
            other => panic!("unexpected part: {:?}", other),
        }
        assert_eq!(parts[2], ContentPart::Text("bare string part".to_string()));

        // Opaque fields survive re-serialization.
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn test_tool_call_message_skips_empty_fields() {
        let msg = ChatMessage::assistant_tool_calls(vec![ToolCall {
            id: "call_1".to_string(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: "search_internet".to_string(),
                arguments: "{\"search_query\":\"rust\"}".to_string(),
            },
        }]);
        let encoded = serde_json::to_value(&msg).unwrap();
        assert!(encoded.get("content").is_none());
        assert!(encoded.get("tool_call_id").is_none());
        assert_eq!(encoded["tool_calls"][0]["function"]["name"], "search_internet");
    }
}
