//! `From` conversions for errors raised by the HTTP and JSON layers.

use super::types::TranslatorError;

impl From<reqwest::Error> for TranslatorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::TimeoutError(err.to_string());
        }
        if err.is_connect() {
            return Self::ConnectionError(err.to_string());
        }
        if err.is_decode() {
            return Self::ParseError(err.to_string());
        }
        // Set by `error_for_status`.
        if let Some(status) = err.status() {
            return Self::api_error(status.as_u16(), status.canonical_reason().unwrap_or("HTTP error"));
        }
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for TranslatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}
