//! Stream decoder
//!
//! Turns transport chunks into `TranslationStreamEvent`s:
//! bytes -> UTF-8 text -> `"\n\n"` frames -> parsed events.
//! Malformed frames are logged and skipped; they never end the stream.

use futures_util::{Stream, StreamExt};
use std::pin::Pin;

use super::events::{TranslationStreamEvent, parse_frame};
use super::frame::FrameBuffer;
use super::utf8_decoder::Utf8StreamDecoder;
use crate::error::{Result, TranslatorError};

/// Stream of decoded events produced by [`decode_byte_stream`].
pub type TranslationStream =
    Pin<Box<dyn Stream<Item = Result<TranslationStreamEvent>> + Send>>;

/// Incremental decoder state for one session.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    utf8: Utf8StreamDecoder,
    frames: FrameBuffer,
    frames_seen: u64,
    frames_skipped: u64,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the events it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<TranslationStreamEvent> {
        let text = self.utf8.decode(chunk);
        self.frames.push_str(&text);

        let mut events = Vec::new();
        for frame in self.frames.extract_frames() {
            self.frames_seen += 1;
            match parse_frame(&frame) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {
                    tracing::trace!(target: "fanyi::streaming", frame = %frame, "ignoring frame without event");
                }
                Err(e) => {
                    self.frames_skipped += 1;
                    tracing::warn!(target: "fanyi::streaming", error = %e, frame = %frame, "skipping malformed frame");
                }
            }
        }
        events
    }

    /// End of transport: drop whatever was never terminated.
    pub fn finish(&mut self) {
        let residue = self.frames.take_residue();
        let pending_bytes = self.utf8.reset();
        if !residue.is_empty() || pending_bytes > 0 {
            tracing::debug!(
                target: "fanyi::streaming",
                residue_len = residue.len(),
                pending_bytes,
                "discarding unterminated stream tail"
            );
        }
    }

    /// Complete frames processed so far (including ignored and malformed ones).
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Frames dropped because their payload failed to parse.
    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    pub fn residue(&self) -> &str {
        self.frames.residue()
    }
}

/// Decode a byte stream into a lazy stream of events.
///
/// The next chunk is only pulled once every event of the previous chunk has
/// been consumed. A transport error is yielded once and ends the stream.
pub fn decode_byte_stream<S, B, E>(byte_stream: S) -> TranslationStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<TranslatorError> + Send + 'static,
{
    let out = async_stream::stream! {
        let mut byte_stream = Box::pin(byte_stream);
        let mut decoder = StreamDecoder::new();

        while let Some(chunk) = byte_stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    let err = match Into::<TranslatorError>::into(e) {
                        TranslatorError::StreamError(msg) => TranslatorError::StreamError(msg),
                        other => TranslatorError::StreamError(other.to_string()),
                    };
                    yield Err(err);
                    return;
                }
            };

            for event in decoder.push(chunk.as_ref()) {
                yield Ok(event);
            }
        }

        decoder.finish();
    };

    Box::pin(out)
}
