//! Common imports for working with the API.
//!
//! ```rust,no_run
//! use claude_ox::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Claude::new("your-api-key");
//! let request = ChatRequest::builder()
//!     .model(Model::Claude35HaikuLatest)
//!     .messages(vec![Message::from("Hello!")])
//!     .build();
//!
//! let response = client.send(&request).await?;
//! # Ok(())
//! # }
//! ```

pub use crate::{
    Claude,
    ClaudeRequestError,
    Model,
    StreamError,
    message::{Content, ImageSource, Message, Messages, Role, Text, ThinkingContent},
    request::{ChatRequest, ThinkingConfig},
    response::{ChatResponse, StopReason},
    streaming::{ContentBlockDelta, MessageStream, StreamEvent},
    tokens::{TokenCountRequest, TokenCountResponse},
    tool::{InputSchema, Property, Tool, ToolChoice, ToolResult, ToolResultContent, ToolUse},
    usage::Usage,
};
