//! UTF-8 stream decoding
//!
//! Transport chunks are split at arbitrary byte offsets, so a multi-byte
//! character may straddle two chunks. `Utf8StreamDecoder` holds back the
//! incomplete tail of a chunk until the rest of the character arrives.

/// Incremental UTF-8 decoder that never splits a character.
#[derive(Debug, Default, Clone)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `pending + chunk` as forms complete characters.
    ///
    /// Invalid sequences are replaced with U+FFFD; an incomplete sequence at
    /// the end is kept for the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::with_capacity(self.pending.len());
        let mut start = 0;
        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(rest) => {
                    out.push_str(rest);
                    start = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[start..valid_end]));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + bad;
                        }
                        None => {
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..start);
        out
    }

    /// Bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop any held-back bytes, returning how many there were.
    pub fn reset(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }
}
