//! fanyi
//!
//! Async client for a streaming translation assistant:
//! - plain and streaming translation requests ([`client::TranslatorClient`])
//! - incremental decoding of the `data: {...}\n\n` event stream ([`streaming`])
//! - session-aware view state that ignores superseded requests ([`view`])
//! - paginated, searchable translation history ([`client::HistoryClient`])
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod retry;
pub mod streaming;
pub mod types;
pub mod view;

pub use error::{Result, TranslatorError};

/// Commonly used items.
pub mod prelude {
    pub use crate::client::{HistoryClient, TranslationService, TranslatorClient};
    pub use crate::config::ClientConfig;
    pub use crate::error::{ErrorCategory, Result, TranslatorError};
    pub use crate::retry::RetryPolicy;
    pub use crate::streaming::{
        SessionOutcome, SessionTracker, StreamDecoder, TranslationSink, TranslationStream,
        TranslationStreamEvent, decode_byte_stream, run_session,
    };
    pub use crate::types::*;
    pub use crate::view::{TranslationForm, TranslationStatus, TranslationView, Translator};
}
