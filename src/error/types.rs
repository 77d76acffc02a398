//! Core error types for fanyi.

use thiserror::Error;

/// Unified error type for every fanyi operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslatorError {
    /// HTTP transport failure that is neither a timeout nor a connect failure.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The server could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request or the response headers did not arrive in time.
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// Non-success status returned by a backend.
    #[error("API error {code}: {message}")]
    ApiError { code: u16, message: String },

    /// JSON (de)serialization failure of a whole request/response body.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// A response was received but could not be interpreted.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The byte stream failed after streaming began.
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Caller-supplied input was rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The session was superseded or cancelled by the caller.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse classification used for retry decisions and user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Network,
    Client,
    Server,
    Parse,
    Input,
    Cancelled,
    Internal,
}

impl TranslatorError {
    /// Build an `ApiError` from a status code and message.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_)
            | Self::ConnectionError(_)
            | Self::TimeoutError(_)
            | Self::StreamError(_) => ErrorCategory::Network,
            Self::ApiError { code, .. } if *code >= 500 => ErrorCategory::Server,
            Self::ApiError { .. } => ErrorCategory::Client,
            Self::JsonError(_) | Self::ParseError(_) => ErrorCategory::Parse,
            Self::InvalidInput(_) | Self::ConfigurationError(_) => ErrorCategory::Input,
            Self::Cancelled(_) => ErrorCategory::Cancelled,
            Self::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// Whether a caller-side retry has a chance of succeeding.
    ///
    /// Stream failures are not retryable: part of the translation may already
    /// be on screen.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::TimeoutError(_) => true,
            Self::ApiError { code, .. } => *code >= 500 || *code == 429,
            _ => false,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TranslatorError>;
