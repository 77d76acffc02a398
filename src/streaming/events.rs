//! Streaming events and frame parsing.

use serde::{Deserialize, Serialize};

use super::frame::DATA_PREFIX;
use crate::error::{Result, TranslatorError};

/// Event carried by one `data: ` frame of the translation stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranslationStreamEvent {
    /// Full cumulative translation so far. Replaces, never appends.
    Update { text: String },
    /// Translation finished successfully.
    End,
    /// Translation failed upstream.
    Error {
        #[serde(default = "default_error_message")]
        message: String,
    },
    /// Any `type` this client does not know; skipped by the decoder.
    #[serde(other)]
    Unknown,
}

fn default_error_message() -> String {
    "Translation failed".to_string()
}

impl TranslationStreamEvent {
    pub fn update(text: impl Into<String>) -> Self {
        Self::Update { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Whether this event decides how the session ends.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End | Self::Error { .. })
    }
}

/// Parse one complete frame (delimiter already stripped).
///
/// Returns `Ok(None)` for frames without the `data: ` prefix and for unknown
/// event types; `Err` when the payload is not a valid event object.
pub fn parse_frame(frame: &str) -> Result<Option<TranslationStreamEvent>> {
    let Some(payload) = frame.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };

    let event: TranslationStreamEvent = serde_json::from_str(payload).map_err(|e| {
        TranslatorError::ParseError(format!("Failed to parse stream frame: {e}"))
    })?;

    match event {
        TranslationStreamEvent::Unknown => Ok(None),
        event => Ok(Some(event)),
    }
}
