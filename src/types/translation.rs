//! Translation request/response types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, TranslatorError};

/// Source language code asking the backend to detect the language itself.
pub const AUTO_DETECT: &str = "auto";

/// Default target language.
pub const DEFAULT_TARGET_LANG: &str = "en";

/// Body of both the plain and the streaming translation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslateRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    /// Request with automatic source-language detection.
    pub fn auto_detect(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self::new(text, AUTO_DETECT, target_lang)
    }

    pub fn is_auto_detect(&self) -> bool {
        self.source_lang == AUTO_DETECT
    }

    /// Reject requests the backend would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(TranslatorError::InvalidInput(
                "Please enter text to translate".to_string(),
            ));
        }
        if self.source_lang.trim().is_empty() {
            return Err(TranslatorError::InvalidInput(
                "source_lang must not be empty".to_string(),
            ));
        }
        if self.target_lang.trim().is_empty() || self.target_lang == AUTO_DETECT {
            return Err(TranslatorError::InvalidInput(format!(
                "invalid target_lang: {:?}",
                self.target_lang
            )));
        }
        Ok(())
    }
}

/// Response of the plain (non-streaming) translation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Supported languages: code -> display name, ordered by code.
pub type LanguageMap = BTreeMap<String, String>;
