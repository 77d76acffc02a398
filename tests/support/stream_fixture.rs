//! Test fixtures utilities: load stream fixtures, split them into chunks and
//! record what a sink receives.

use fanyi::TranslatorError;
use fanyi::streaming::TranslationSink;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("translate")
}

/// Raw bytes of a fixture file.
pub fn load_fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixtures_dir().join(name)).expect("read fixture")
}

/// Split `bytes` at the given (sorted, deduplicated, clamped) offsets.
pub fn split_at_offsets(bytes: &[u8], offsets: &[usize]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = offsets.iter().map(|o| (*o).min(bytes.len())).collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut out = Vec::new();
    let mut start = 0;
    for cut in cuts {
        out.push(bytes[start..cut].to_vec());
        start = cut;
    }
    out.push(bytes[start..].to_vec());
    out
}

/// Chunks as a transport-like stream.
pub fn as_byte_stream(
    chunks: Vec<Vec<u8>>,
) -> impl futures_util::Stream<Item = Result<Vec<u8>, TranslatorError>> + Send + 'static {
    futures_util::stream::iter(chunks.into_iter().map(Ok))
}

/// Everything a sink was asked to do, in order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Recording {
    pub calls: Vec<SinkCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Update(String),
    Complete,
    Error(String),
}

impl Recording {
    pub fn displayed_text(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            SinkCall::Update(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn completions(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SinkCall::Complete))
            .count()
    }
}

/// Sink that records into shared storage so a test can inspect it while a
/// session is still running elsewhere.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink(pub Arc<Mutex<Recording>>);

impl RecordingSink {
    pub fn snapshot(&self) -> Recording {
        self.0.lock().unwrap().clone()
    }
}

impl TranslationSink for RecordingSink {
    fn on_update(&mut self, text: &str) {
        self.0.lock().unwrap().calls.push(SinkCall::Update(text.to_string()));
    }

    fn on_complete(&mut self) {
        self.0.lock().unwrap().calls.push(SinkCall::Complete);
    }

    fn on_error(&mut self, message: &str) {
        self.0.lock().unwrap().calls.push(SinkCall::Error(message.to_string()));
    }
}
