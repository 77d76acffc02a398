//! Translation input form.

use super::state::TranslationView;
use crate::error::Result;
use crate::types::{AUTO_DETECT, DEFAULT_TARGET_LANG, TranslateRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationForm {
    pub source_lang: String,
    pub target_lang: String,
    pub source_text: String,
}

impl Default for TranslationForm {
    fn default() -> Self {
        Self {
            source_lang: AUTO_DETECT.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            source_text: String::new(),
        }
    }
}

impl TranslationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_submit(&self) -> bool {
        !self.source_text.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.source_text.chars().count()
    }

    /// Build a validated request from the current input.
    pub fn to_request(&self) -> Result<TranslateRequest> {
        let request = TranslateRequest::new(
            self.source_text.clone(),
            self.source_lang.clone(),
            self.target_lang.clone(),
        );
        request.validate()?;
        Ok(request)
    }

    /// Swap source and target languages.
    ///
    /// Refused while the source is auto-detected. When a translation is on
    /// screen, the source text and the translation trade places as well.
    pub fn swap_languages(&mut self, view: &mut TranslationView) -> bool {
        if self.source_lang == AUTO_DETECT {
            return false;
        }
        std::mem::swap(&mut self.source_lang, &mut self.target_lang);
        if !view.text().is_empty() {
            let translated = view.text().to_string();
            view.set_text(std::mem::replace(&mut self.source_text, translated));
        }
        true
    }

    /// Reset both texts and the status line.
    pub fn clear(&mut self, view: &mut TranslationView) {
        self.source_text.clear();
        view.clear();
    }
}
