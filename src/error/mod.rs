//! Error Handling Module
//!
//! - Core error types (`TranslatorError`, `ErrorCategory`)
//! - HTTP error classification and user-facing status text
//! - Conversions from `reqwest` and `serde_json` errors
//!
//! # Example
//!
//! ```rust,ignore
//! use fanyi::error::{ErrorCategory, TranslatorError};
//!
//! let error = TranslatorError::api_error(404, "Not found");
//! assert_eq!(error.category(), ErrorCategory::Client);
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod helpers;
pub mod types;

pub use helpers::*;
pub use types::*;
