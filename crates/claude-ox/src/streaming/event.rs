use serde::{Deserialize, Serialize};

use crate::{
    error::ErrorInfo,
    message::{Content, Role},
    response::StopReason,
    usage::Usage,
};

/// Partial message snapshot carried by a `message_start` event. Everything
/// except the id and role may be absent this early in the stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamMessage {
    pub id: String,
    #[serde(default)]
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

/// One discrete protocol event, decoded from a single `data:` line.
///
/// A block index's lifecycle is always start, zero or more deltas, stop.
/// `ping` and `error` are transport extras; the assembler ignores them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    MessageStart {
        message: StreamMessage,
    },
    ContentBlockStart {
        index: usize,
        content_block: Content,
    },
    ContentBlockDelta {
        index: usize,
        delta: ContentBlockDelta,
    },
    ContentBlockStop {
        index: usize,
    },
    MessageDelta {
        delta: MessageDelta,
        #[serde(default)]
        usage: Option<Usage>,
    },
    MessageStop {
        #[serde(default)]
        stop_reason: Option<StopReason>,
        #[serde(default)]
        usage: Option<Usage>,
    },
    Ping,
    Error {
        error: ErrorInfo,
    },
}

/// Incremental fragment applied to the content block at the event's index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlockDelta {
    TextDelta { text: String },
    InputJsonDelta { partial_json: String },
    ThinkingDelta { thinking: String },
    SignatureDelta { signature: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageDelta {
    #[serde(default)]
    pub stop_reason: Option<StopReason>,
    #[serde(default)]
    pub stop_sequence: Option<String>,
}
