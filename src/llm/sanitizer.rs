//! Transcript sanitization for model runners that reject consecutive
//! assistant messages.
//!
//! Some OpenAI-compatible backends (Docker Model Runner among them) refuse a
//! message list containing two or more assistant messages in a row. The
//! transform below merges each such run into a single assistant message
//! before the transcript leaves the process.

use crate::llm::message::{ChatMessage, ChatRole, ContentPart, MessageContent};

/// Merge every run of consecutive assistant messages into one message.
///
/// Non-assistant messages are copied through unchanged and in order. For each
/// run of assistant messages, the textual content of the whole run is joined
/// with blank lines and emitted as a single assistant message; every other
/// attribute is taken from the first message of the run. Non-text content
/// parts contribute nothing. The input is never mutated.
pub fn merge_consecutive_assistant(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut merged = Vec::with_capacity(messages.len());
    let mut i = 0;
    while i < messages.len() {
        if messages[i].role != ChatRole::Assistant {
            merged.push(messages[i].clone());
            i += 1;
            continue;
        }

        let mut parts: Vec<String> = Vec::new();
        let mut j = i;
        while j < messages.len() && messages[j].role == ChatRole::Assistant {
            collect_text_parts(&messages[j], &mut parts);
            j += 1;
        }

        let mut out = messages[i].clone();
        out.content = Some(MessageContent::Text(parts.join("\n\n")));
        merged.push(out);
        i = j;
    }
    merged
}

/// Append every non-empty text fragment of `msg` to `parts`.
fn collect_text_parts(msg: &ChatMessage, parts: &mut Vec<String>) {
    match &msg.content {
        None => {}
        Some(MessageContent::Text(text)) => {
            if !text.is_empty() {
                parts.push(text.clone());
            }
        }
        Some(MessageContent::Parts(content)) => {
            for part in content {
                match part {
                    ContentPart::Text(text) => {
                        if !text.is_empty() {
                            parts.push(text.clone());
                        }
                    }
                    ContentPart::Block(block) if block.kind == "text" => {
                        let text = block.text.clone().unwrap_or_default();
                        if !text.is_empty() {
                            parts.push(text);
                        }
                    }
                    // Images and other non-text blocks are dropped.
                    ContentPart::Block(_) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::ContentBlock;
    use serde_json::json;

    fn text_of(msg: &ChatMessage) -> &str {
        match &msg.content {
            Some(MessageContent::Text(text)) => text,
            other => panic!("expected plain text content, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_transcript() {
        assert!(merge_consecutive_assistant(&[]).is_empty());
    }

    #[test]
    fn test_transcript_without_runs_is_unchanged() {
        let messages = vec![
            ChatMessage::system("be helpful"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
            ChatMessage::user("ok"),
            ChatMessage::assistant("done"),
        ];
        assert_eq!(merge_consecutive_assistant(&messages), messages);
    }

    #[test]
    fn test_pair_is_merged_with_blank_line() {
        let messages = vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("a"),
            ChatMessage::assistant("b"),
            ChatMessage::user("ok"),
        ];
        let merged = merge_consecutive_assistant(&messages);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], messages[0]);
        assert_eq!(merged[1].role, ChatRole::Assistant);
        assert_eq!(text_of(&merged[1]), "a\n\nb");
        assert_eq!(merged[2], messages[3]);
    }

    #[test]
    fn test_run_collapses_to_one_message() {
        for run_len in 2..6 {
            let mut messages = vec![ChatMessage::user("hi")];
            for k in 0..run_len {
                messages.push(ChatMessage::assistant(format!("part {}", k)));
            }
            messages.push(ChatMessage::user("ok"));

            let merged = merge_consecutive_assistant(&messages);
            assert_eq!(merged.len(), messages.len() - (run_len - 1));
            let expected: Vec<String> = (0..run_len).map(|k| format!("part {}", k)).collect();
            assert_eq!(text_of(&merged[1]), expected.join("\n\n"));
        }
    }

    #[test]
    fn test_multiple_runs() {
        let messages = vec![
            ChatMessage::assistant("a"),
            ChatMessage::assistant("b"),
            ChatMessage::user("u"),
            ChatMessage::assistant("c"),
            ChatMessage::assistant("d"),
            ChatMessage::assistant("e"),
        ];
        let merged = merge_consecutive_assistant(&messages);
        assert_eq!(merged.len(), 3);
        assert_eq!(text_of(&merged[0]), "a\n\nb");
        assert_eq!(merged[1].role, ChatRole::User);
        assert_eq!(text_of(&merged[2]), "c\n\nd\n\ne");
    }

    #[test]
    fn test_multi_part_content_merges_text_only() {
        let first = ChatMessage::new(
            ChatRole::Assistant,
            Some(MessageContent::Parts(vec![
                ContentPart::Block(ContentBlock::text("x")),
                ContentPart::Block(
                    serde_json::from_value(json!({
                        "type": "image",
                        "url": "http://example.com/a.png"
                    }))
                    .unwrap(),
                ),
            ])),
            None,
            None,
        );
        let messages = vec![first, ChatMessage::assistant("y")];
        let merged = merge_consecutive_assistant(&messages);
        assert_eq!(merged.len(), 1);
        assert_eq!(text_of(&merged[0]), "x\n\ny");
    }

    #[test]
    fn test_empty_and_missing_text_is_filtered() {
        let messages = vec![
            ChatMessage::assistant(""),
            ChatMessage::new(
                ChatRole::Assistant,
                Some(MessageContent::Parts(vec![
                    ContentPart::Text(String::new()),
                    // "text" block without a text field defaults to empty.
                    ContentPart::Block(serde_json::from_value(json!({"type": "text"})).unwrap()),
                    ContentPart::Text("kept".to_string()),
                ])),
                None,
                None,
            ),
            ChatMessage::assistant("also kept"),
        ];
        let merged = merge_consecutive_assistant(&messages);
        assert_eq!(merged.len(), 1);
        assert_eq!(text_of(&merged[0]), "kept\n\nalso kept");
    }

    #[test]
    fn test_attributes_come_from_first_of_run() {
        let mut first = ChatMessage::assistant("a");
        first.tool_call_id = Some("marker".to_string());
        let messages = vec![first, ChatMessage::assistant("b")];
        let merged = merge_consecutive_assistant(&messages);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].tool_call_id.as_deref(), Some("marker"));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let messages = vec![ChatMessage::assistant("a"), ChatMessage::assistant("b")];
        let snapshot = messages.clone();
        let _ = merge_consecutive_assistant(&messages);
        assert_eq!(messages, snapshot);
    }

    #[test]
    fn test_idempotent() {
        let messages = vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("a"),
            ChatMessage::assistant("b"),
            ChatMessage::user("ok"),
            ChatMessage::assistant("c"),
            ChatMessage::assistant("d"),
        ];
        let once = merge_consecutive_assistant(&messages);
        let twice = merge_consecutive_assistant(&once);
        assert_eq!(once, twice);
        // No adjacent assistant pair survives one pass.
        for pair in once.windows(2) {
            assert!(pair[0].role != ChatRole::Assistant || pair[1].role != ChatRole::Assistant);
        }
    }
}
