//! Frame reassembly
//!
//! Accumulates decoded text and hands out complete `"\n\n"`-delimited frames.
//! The trailing, possibly incomplete segment always stays buffered.

/// Separator between frames on the wire.
pub const FRAME_DELIMITER: &str = "\n\n";

/// Prefix a frame must start with to carry a payload.
pub const DATA_PREFIX: &str = "data: ";

/// Text accumulator owned by a single decode session.
#[derive(Debug, Default, Clone)]
pub struct FrameBuffer {
    buffer: String,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Remove and return every complete frame, in arrival order.
    ///
    /// Frames are returned without their delimiter. Consumed text is dropped
    /// from the buffer in one pass; the remainder is left untouched.
    pub fn extract_frames(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        let mut consumed = 0;
        while let Some(pos) = self.buffer[consumed..].find(FRAME_DELIMITER) {
            frames.push(self.buffer[consumed..consumed + pos].to_string());
            consumed += pos + FRAME_DELIMITER.len();
        }
        if consumed > 0 {
            self.buffer.drain(..consumed);
        }
        frames
    }

    /// Unterminated text still waiting for its delimiter.
    pub fn residue(&self) -> &str {
        &self.buffer
    }

    /// Discard the unterminated remainder, returning it.
    pub fn take_residue(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}
