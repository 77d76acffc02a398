//! Error helpers: HTTP classification and user-facing summaries.

use super::types::{ErrorCategory, TranslatorError};

/// Turn a non-success HTTP response into a `TranslatorError`.
///
/// Both backends report failures as a JSON object with an `error` field
/// (the history service sometimes uses `message`). Anything else falls back
/// to the raw body, then to the status' canonical reason.
pub fn classify_http_error(status: u16, body: &str) -> TranslatorError {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
        });

    let message = match from_json {
        Some(m) if !m.trim().is_empty() => m,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown error")
            .to_string(),
    };

    TranslatorError::api_error(status, message)
}

impl TranslatorError {
    /// Single-line status text suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError { message, .. } => message.clone(),
            Self::TimeoutError(_) => "The server did not respond in time".to_string(),
            Self::ConnectionError(_) => {
                "Cannot reach the translation service; make sure it is running".to_string()
            }
            Self::InvalidInput(msg) => msg.clone(),
            Self::Cancelled(_) => "Translation cancelled".to_string(),
            other => match other.category() {
                ErrorCategory::Parse => "The server sent a response that could not be read".to_string(),
                ErrorCategory::Network => format!("Translation failed: {other}"),
                _ => format!("Request error: {other}"),
            },
        }
    }
}
