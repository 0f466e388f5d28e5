use std::collections::HashMap;

use super::event::{ContentBlockDelta, StreamEvent};
use crate::{
    message::{Content, Text},
    response::ChatResponse,
};

/// Folds a sequence of [`StreamEvent`]s into the message under construction.
///
/// Applying an event is synchronous, infallible and free of I/O: malformed or
/// premature tool-input fragments simply fail to parse and leave the previous
/// value in place, and deltas whose sub-kind does not match the block at
/// their index are dropped (tolerant merge). The accumulating message is
/// inspectable between events.
#[derive(Debug, Default)]
pub struct MessageAccumulator {
    message: ChatResponse,
    json_buffers: HashMap<usize, String>,
}

impl MessageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> &ChatResponse {
        &self.message
    }

    pub fn into_message(self) -> ChatResponse {
        self.message
    }

    pub fn apply(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::MessageStart { message } => {
                self.message.id = message.id.clone();
                self.message.role = message.role.clone();
                self.message.model = message.model.clone();
            }
            StreamEvent::ContentBlockStart {
                index,
                content_block,
            } => {
                self.ensure_block(*index);
                self.message.content[*index] = content_block.clone();
                if matches!(content_block, Content::ToolUse(_)) {
                    self.json_buffers.insert(*index, String::new());
                }
            }
            StreamEvent::ContentBlockDelta { index, delta } => {
                // An index that never saw its start event is initialized
                // defensively rather than rejected.
                self.ensure_block(*index);
                self.apply_delta(*index, delta);
            }
            StreamEvent::ContentBlockStop { index } => {
                // Re-sync in case the last delta's parse attempt was skipped
                // or failed on a then-incomplete buffer.
                self.try_parse_tool_input(*index);
            }
            // Reserved: the minimal contract folds stop metadata from
            // message_stop only.
            StreamEvent::MessageDelta { .. } => {}
            StreamEvent::MessageStop { stop_reason, usage } => {
                if stop_reason.is_some() {
                    self.message.stop_reason = *stop_reason;
                }
                if let Some(usage) = usage {
                    self.message.usage = usage.clone();
                }
            }
            StreamEvent::Ping | StreamEvent::Error { .. } => {}
        }
    }

    fn apply_delta(&mut self, index: usize, delta: &ContentBlockDelta) {
        match delta {
            ContentBlockDelta::TextDelta { text } => {
                if let Content::Text(block) = &mut self.message.content[index] {
                    block.push_str(text);
                }
            }
            ContentBlockDelta::InputJsonDelta { partial_json } => {
                if matches!(self.message.content[index], Content::ToolUse(_)) {
                    self.json_buffers
                        .entry(index)
                        .or_default()
                        .push_str(partial_json);
                    self.try_parse_tool_input(index);
                }
            }
            ContentBlockDelta::ThinkingDelta { thinking } => {
                if let Content::Thinking(block) = &mut self.message.content[index] {
                    block.thinking.push_str(thinking);
                }
            }
            ContentBlockDelta::SignatureDelta { signature } => {
                if let Content::Thinking(block) = &mut self.message.content[index] {
                    // Signatures replace; they are not accumulated.
                    block.signature = Some(signature.clone());
                }
            }
        }
    }

    /// Grow the content sequence with empty placeholder blocks until `index`
    /// is addressable.
    fn ensure_block(&mut self, index: usize) {
        while self.message.content.len() <= index {
            self.message.content.push(Content::Text(Text::default()));
        }
    }

    /// Opportunistically parse the accumulated input fragments for a
    /// tool-use block. Arguments stream as bare JSON text with no completion
    /// marker, so every fragment that leaves the buffer looking like a whole
    /// object triggers a full re-parse; later fragments may overwrite the
    /// result.
    fn try_parse_tool_input(&mut self, index: usize) {
        let Some(buffer) = self.json_buffers.get(&index) else {
            return;
        };
        let candidate = buffer.trim();
        if !(candidate.starts_with('{') && candidate.ends_with('}')) {
            return;
        }
        if let Ok(input) = serde_json::from_str::<serde_json::Value>(candidate) {
            if let Some(Content::ToolUse(tool_use)) = self.message.content.get_mut(index) {
                tool_use.input = input;
            }
        }
    }
}
