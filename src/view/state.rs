//! Displayed translation state.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::TranslatorError;
use crate::streaming::{SessionId, TranslationSink};

/// Status line shown next to the translation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TranslationStatus {
    #[default]
    Idle,
    Translating,
    Succeeded,
    Failed(String),
}

/// What the user currently sees for the translation output.
#[derive(Debug, Clone, Default)]
pub struct TranslationView {
    text: String,
    status: TranslationStatus,
    session: Option<SessionId>,
}

impl TranslationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> &TranslationStatus {
        &self.status
    }

    pub fn is_translating(&self) -> bool {
        self.status == TranslationStatus::Translating
    }

    /// Session whose events this view currently accepts.
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// Bind the view to a new session. Events of any other session are
    /// ignored from now on; the previous text stays until the first update.
    pub fn begin(&mut self, session: SessionId) {
        self.session = Some(session);
        self.status = TranslationStatus::Translating;
    }

    /// Detach from the current session and go back to idle.
    pub fn clear(&mut self) {
        self.text.clear();
        self.status = TranslationStatus::Idle;
        self.session = None;
    }

    /// Dismiss a success indication.
    pub fn acknowledge(&mut self) {
        if self.status == TranslationStatus::Succeeded {
            self.status = TranslationStatus::Idle;
        }
    }

    /// Stop accepting events from the bound session, keeping what is shown.
    pub(crate) fn detach(&mut self) {
        self.session = None;
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl TranslationSink for TranslationView {
    fn on_update(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    fn on_complete(&mut self) {
        self.status = TranslationStatus::Succeeded;
    }

    fn on_error(&mut self, message: &str) {
        self.status = TranslationStatus::Failed(message.to_string());
    }
}

/// Sink that applies one session's events to a shared view.
///
/// The session check happens under the view lock, so a stale session can
/// never interleave with the one that replaced it.
#[derive(Debug, Clone)]
pub struct ViewSink {
    view: Arc<Mutex<TranslationView>>,
    session: SessionId,
}

impl ViewSink {
    pub fn new(view: Arc<Mutex<TranslationView>>, session: SessionId) -> Self {
        Self { view, session }
    }

    fn with_view(&self, apply: impl FnOnce(&mut TranslationView)) {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        if view.session == Some(self.session) {
            apply(&mut *view);
        } else {
            tracing::debug!(target: "fanyi::view", session = %self.session, "view moved on, dropping event");
        }
    }
}

impl TranslationSink for ViewSink {
    fn on_update(&mut self, text: &str) {
        self.with_view(|v| v.on_update(text));
    }

    fn on_complete(&mut self) {
        self.with_view(|v| v.on_complete());
    }

    fn on_error(&mut self, message: &str) {
        self.with_view(|v| v.on_error(message));
    }

    fn on_failure(&mut self, error: &TranslatorError) {
        self.with_view(|v| v.on_failure(error));
    }
}
