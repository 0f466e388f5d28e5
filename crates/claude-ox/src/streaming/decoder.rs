use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream::BoxStream};

use super::event::StreamEvent;
use crate::error::StreamError;

/// Decodes a `text/event-stream` byte stream into typed [`StreamEvent`]s,
/// one per pull.
///
/// Only complete lines are ever held in memory, so the buffer is bounded by
/// the longest single line the transport produces. Blank lines, SSE comments
/// and non-`data:` fields are filtered out inside [`next_event`].
///
/// [`next_event`]: EventDecoder::next_event
pub struct EventDecoder {
    bytes: BoxStream<'static, Result<Bytes, StreamError>>,
    buffer: Vec<u8>,
    finished: bool,
}

impl EventDecoder {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, StreamError>> + Send + 'static,
    {
        Self {
            bytes: Box::pin(stream.fuse()),
            buffer: Vec::new(),
            finished: false,
        }
    }

    pub fn from_response(response: reqwest::Response) -> Self {
        Self::new(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(StreamError::from)),
        )
    }

    /// Pull the next event, skipping framing lines until a genuine `data:`
    /// line, end-of-stream, or an error.
    ///
    /// Both error kinds are terminal: after an `Err`, and after clean
    /// end-of-input, every further call returns `Ok(None)`.
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>, StreamError> {
        if self.finished {
            return Ok(None);
        }
        let result = self.advance().await;
        match &result {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => self.finished = true,
        }
        result
    }

    async fn advance(&mut self) -> Result<Option<StreamEvent>, StreamError> {
        loop {
            while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
                let line = decode_utf8(line_bytes)?;
                if let Some(event) = decode_line(&line)? {
                    return Ok(Some(event));
                }
            }

            match self.bytes.next().await {
                Some(chunk) => self.buffer.extend_from_slice(&chunk?),
                None => {
                    // Chunked transports may drop the final newline; the
                    // leftover is still one decodable line.
                    if self.buffer.is_empty() {
                        return Ok(None);
                    }
                    let line = decode_utf8(std::mem::take(&mut self.buffer))?;
                    return decode_line(&line);
                }
            }
        }
    }
}

fn decode_utf8(bytes: Vec<u8>) -> Result<String, StreamError> {
    String::from_utf8(bytes)
        .map_err(|e| StreamError::Decode(format!("invalid UTF-8 in event stream: {e}")))
}

/// Decode a single SSE line. Returns `Ok(None)` for every line that does not
/// carry an event payload.
fn decode_line(line: &str) -> Result<Option<StreamEvent>, StreamError> {
    let line = line.trim_end_matches(|c| c == '\n' || c == '\r');

    if line.is_empty() || line.starts_with(':') {
        return Ok(None);
    }

    let Some(rest) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = rest.trim_start();

    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }

    serde_json::from_str(data)
        .map(Some)
        .map_err(|e| StreamError::Decode(format!("invalid event payload: {e}")))
}
