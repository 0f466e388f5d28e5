//! Incremental reconstruction of a streamed message.
//!
//! The transport delivers a message as a sequence of server-sent events;
//! [`EventDecoder`] turns the raw bytes into typed events and
//! [`MessageAccumulator`] folds each one into a single growing
//! [`ChatResponse`]. [`MessageStream`] ties the two together behind a
//! pull-based cursor: advance, inspect, advance.

pub mod accumulator;
pub mod decoder;
pub mod event;

pub use accumulator::MessageAccumulator;
pub use decoder::EventDecoder;
pub use event::{ContentBlockDelta, MessageDelta, StreamEvent, StreamMessage};

use bytes::Bytes;
use futures_util::{Stream, stream::BoxStream};

use crate::{error::StreamError, response::ChatResponse};

/// A streamed message in flight.
///
/// The caller drives iteration by awaiting [`next`]; each pulled event is
/// folded into the accumulating message before it is returned, so
/// [`message`] is coherent at every point of the stream, including after an
/// error. Dropping the stream cancels it.
///
/// [`next`]: MessageStream::next
/// [`message`]: MessageStream::message
pub struct MessageStream {
    decoder: EventDecoder,
    accumulator: MessageAccumulator,
    current: Option<StreamEvent>,
    error: Option<StreamError>,
}

impl MessageStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, StreamError>> + Send + 'static,
    {
        Self {
            decoder: EventDecoder::new(stream),
            accumulator: MessageAccumulator::new(),
            current: None,
            error: None,
        }
    }

    pub fn from_response(response: reqwest::Response) -> Self {
        Self {
            decoder: EventDecoder::from_response(response),
            accumulator: MessageAccumulator::new(),
            current: None,
            error: None,
        }
    }

    /// Advance to the next event, folding it into the message.
    ///
    /// Returns `None` once the stream is exhausted *or* a terminal error
    /// occurred; [`error`] distinguishes the two.
    ///
    /// [`error`]: MessageStream::error
    pub async fn next(&mut self) -> Option<StreamEvent> {
        if self.error.is_some() {
            return None;
        }
        match self.decoder.next_event().await {
            Ok(Some(event)) => {
                self.accumulator.apply(&event);
                self.current = Some(event.clone());
                Some(event)
            }
            Ok(None) => None,
            Err(error) => {
                self.error = Some(error);
                None
            }
        }
    }

    /// The most recently pulled event.
    pub fn current(&self) -> Option<&StreamEvent> {
        self.current.as_ref()
    }

    /// The terminal error, if one ended the stream. Everything folded before
    /// the error remains visible through [`message`].
    ///
    /// [`message`]: MessageStream::message
    pub fn error(&self) -> Option<&StreamError> {
        self.error.as_ref()
    }

    /// The message accumulated so far. Valid at any point during iteration;
    /// final once `next` has returned `None` without an error.
    pub fn message(&self) -> &ChatResponse {
        self.accumulator.message()
    }

    pub fn into_message(self) -> ChatResponse {
        self.accumulator.into_message()
    }

    /// Drain the stream to exhaustion and return the completed message.
    pub async fn final_message(mut self) -> Result<ChatResponse, StreamError> {
        while self.next().await.is_some() {}
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.accumulator.into_message()),
        }
    }

    /// Adapt the cursor to a [`futures_util::Stream`] of events for callers
    /// that want combinators. The accumulated message is not observable
    /// through this surface.
    pub fn into_events(self) -> BoxStream<'static, Result<StreamEvent, StreamError>> {
        Box::pin(async_stream::stream! {
            let mut message_stream = self;
            loop {
                match message_stream.decoder.next_event().await {
                    Ok(Some(event)) => {
                        message_stream.accumulator.apply(&event);
                        yield Ok(event);
                    }
                    Ok(None) => break,
                    Err(error) => {
                        yield Err(error);
                        break;
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for MessageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStream")
            .field("current", &self.current)
            .field("error", &self.error)
            .field("message", self.accumulator.message())
            .finish_non_exhaustive()
    }
}
