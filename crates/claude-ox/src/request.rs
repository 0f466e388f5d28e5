use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    message::{Message, Messages, StringOrContents},
    tool::{Tool, ToolChoice},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThinkingConfig {
    #[serde(rename = "type")]
    pub config_type: String,
    pub budget_tokens: u32,
}

impl ThinkingConfig {
    /// Create a new thinking configuration with the specified token budget.
    /// The API enforces a minimum budget of 1024 tokens.
    pub fn new(budget_tokens: u32) -> Self {
        Self {
            config_type: "enabled".to_string(),
            budget_tokens: budget_tokens.max(1024),
        }
    }

    /// Thinking config with the minimum budget (1024 tokens).
    pub fn enabled() -> Self {
        Self::new(1024)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ChatRequest {
    #[builder(field)]
    pub messages: Messages,
    #[builder(into)]
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub system: Option<StringOrContents>,
    #[builder(default = 4096)]
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
}

impl<S: chat_request_builder::State> ChatRequestBuilder<S> {
    pub fn messages(mut self, messages: impl IntoIterator<Item = impl Into<Message>>) -> Self {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.messages.push(message.into());
        self
    }
}

impl ChatRequest {
    pub fn push_message(&mut self, message: impl Into<Message>) {
        self.messages.push(message.into());
    }

    /// Enable streaming for this request
    pub fn streaming(mut self) -> Self {
        self.stream = Some(true);
        self
    }

    /// Set temperature for response randomness (0.0 to 1.0)
    pub fn temp(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Add a single stop sequence
    pub fn stop_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.stop_sequences
            .get_or_insert_with(Vec::new)
            .push(sequence.into());
        self
    }

    /// Enable thinking with the specified token budget
    pub fn with_thinking(mut self, budget_tokens: u32) -> Self {
        self.thinking = Some(ThinkingConfig::new(budget_tokens));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn thinking_config_enforces_minimum_budget() {
        let config = ThinkingConfig::new(512);
        assert_eq!(config.budget_tokens, 1024);

        let config = ThinkingConfig::new(2048);
        assert_eq!(config.budget_tokens, 2048);
    }

    #[test]
    fn thinking_config_serialization() {
        let config = ThinkingConfig::new(4096);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"type":"enabled","budget_tokens":4096}"#);

        let deserialized: ThinkingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn builder_collects_messages() {
        let request = ChatRequest::builder()
            .model("claude-3-5-haiku-latest")
            .message(Message::from("Hello"))
            .message(Message::from("Are you there?"))
            .build();

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.max_tokens, 4096);
        assert!(request.stream.is_none());
    }

    #[test]
    fn streaming_flag_round_trips() {
        let request = ChatRequest::builder()
            .model("claude-3-5-haiku-latest")
            .messages(vec![Message::from("Hi")])
            .build()
            .streaming();

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"stream\":true"));
    }

    #[test]
    fn optional_fields_are_omitted_when_unset() {
        let request = ChatRequest::builder()
            .model("claude-3-5-haiku-latest")
            .messages(vec![Message::from("Hi")])
            .build();

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
        assert!(!json.contains("tool_choice"));
        assert!(!json.contains("thinking"));
    }

    #[test]
    fn with_thinking_sets_config() {
        let request = ChatRequest::builder()
            .model("claude-3-7-sonnet-latest")
            .messages(vec![Message::from("Hello")])
            .build()
            .with_thinking(3072);

        let thinking = request.thinking.expect("thinking should be set");
        assert_eq!(thinking.config_type, "enabled");
        assert_eq!(thinking.budget_tokens, 3072);
    }
}
