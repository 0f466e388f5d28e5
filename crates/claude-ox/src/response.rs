use serde::{Deserialize, Serialize};

use crate::{
    message::{Content, Role, ThinkingContent},
    usage::Usage,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
}

/// A complete assistant message, either returned whole by the API or
/// assembled incrementally from a stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_response_type")]
    pub r#type: String,
    pub role: Role,
    #[serde(default)]
    pub content: Vec<Content>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub stop_reason: Option<StopReason>,
    #[serde(default)]
    pub stop_sequence: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

fn default_response_type() -> String {
    "message".to_string()
}

impl Default for ChatResponse {
    fn default() -> Self {
        Self {
            id: String::new(),
            r#type: default_response_type(),
            role: Role::Assistant,
            content: Vec::new(),
            model: String::new(),
            stop_reason: None,
            stop_sequence: None,
            usage: Usage::default(),
        }
    }
}

impl ChatResponse {
    pub fn text_content(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|content| {
                if let Content::Text(text) = content {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn tool_uses(&self) -> impl Iterator<Item = &crate::tool::ToolUse> {
        self.content.iter().filter_map(|content| {
            if let Content::ToolUse(tool_use) = content {
                Some(tool_use)
            } else {
                None
            }
        })
    }

    pub fn has_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|content| matches!(content, Content::ToolUse(_)))
    }

    pub fn thinking_content(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|content| {
                if let Content::Thinking(thinking) = content {
                    Some(thinking.thinking.as_str())
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn thinking_blocks(&self) -> impl Iterator<Item = &ThinkingContent> {
        self.content.iter().filter_map(|content| {
            if let Content::Thinking(thinking) = content {
                Some(thinking)
            } else {
                None
            }
        })
    }

    pub fn has_thinking(&self) -> bool {
        self.content
            .iter()
            .any(|content| matches!(content, Content::Thinking(_)))
    }
}

impl std::fmt::Display for ChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut content_summary = Vec::new();

        let text_parts = self.text_content();
        if !text_parts.is_empty() {
            content_summary.push(format!("text: [{}]", text_parts.join(", ")));
        }

        let thinking_parts = self.thinking_content();
        if !thinking_parts.is_empty() {
            content_summary.push(format!("thinking: [{}]", thinking_parts.len()));
        }

        if self.has_tool_use() {
            content_summary.push("tools".to_string());
        }

        write!(
            f,
            "ChatResponse {{ id: {}, type: {}, role: {:?}, model: {}, content: {} }}",
            self.id,
            self.r#type,
            self.role,
            self.model,
            content_summary.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Text;

    fn response_with_thinking() -> ChatResponse {
        ChatResponse {
            id: "test_id".to_string(),
            content: vec![
                Content::Thinking(ThinkingContent::new("Let me think about this...")),
                Content::Text(Text::new("The answer is 42.")),
                Content::Thinking(ThinkingContent::with_signature(
                    "Additional reasoning...",
                    "sig123",
                )),
            ],
            model: "claude-3-7-sonnet-latest".to_string(),
            stop_reason: Some(StopReason::EndTurn),
            usage: Usage {
                input_tokens: Some(10),
                output_tokens: Some(20),
                ..Usage::default()
            },
            ..ChatResponse::default()
        }
    }

    #[test]
    fn thinking_content_extraction() {
        let response = response_with_thinking();

        let thinking_texts = response.thinking_content();
        assert_eq!(thinking_texts.len(), 2);
        assert_eq!(thinking_texts[0], "Let me think about this...");
        assert_eq!(thinking_texts[1], "Additional reasoning...");
    }

    #[test]
    fn thinking_blocks_keep_signatures() {
        let response = response_with_thinking();

        let thinking_blocks: Vec<_> = response.thinking_blocks().collect();
        assert_eq!(thinking_blocks.len(), 2);
        assert_eq!(thinking_blocks[0].signature, None);
        assert_eq!(thinking_blocks[1].signature, Some("sig123".to_string()));
    }

    #[test]
    fn display_summarizes_content() {
        let response = response_with_thinking();
        let display = format!("{}", response);

        assert!(display.contains("thinking: [2]"));
        assert!(display.contains("text:"));
        assert!(display.contains("ChatResponse"));
    }

    #[test]
    fn deserializes_api_response_body() {
        let json = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "Hi there"}],
            "model": "claude-3-5-haiku-latest",
            "stop_reason": "end_turn",
            "stop_sequence": null,
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "msg_01");
        assert_eq!(response.text_content(), vec!["Hi there"]);
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(response.usage.total_tokens(), 15);
    }

    #[test]
    fn stop_reason_wire_names() {
        assert_eq!(
            serde_json::to_string(&StopReason::ToolUse).unwrap(),
            r#""tool_use""#
        );
        assert_eq!(
            serde_json::from_str::<StopReason>(r#""max_tokens""#).unwrap(),
            StopReason::MaxTokens
        );
    }
}
