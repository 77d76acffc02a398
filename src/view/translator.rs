//! Translation controller
//!
//! Ties a [`TranslationService`] to a shared [`TranslationView`]. Every call
//! starts a new session; a newer call supersedes an older one still in
//! flight, and the older one's late events are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::state::{TranslationView, ViewSink};
use crate::client::TranslationService;
use crate::error::{Result, TranslatorError};
use crate::streaming::{
    SessionOutcome, SessionToken, SessionTracker, TranslationSink, run_session,
};
use crate::types::{TranslateRequest, TranslateResponse};

pub struct Translator<S> {
    service: S,
    tracker: SessionTracker,
    view: Arc<Mutex<TranslationView>>,
}

impl<S: TranslationService> Translator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            tracker: SessionTracker::new(),
            view: Arc::new(Mutex::new(TranslationView::new())),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Shared handle to the displayed state.
    pub fn view(&self) -> Arc<Mutex<TranslationView>> {
        self.view.clone()
    }

    /// Snapshot of the displayed state.
    pub fn snapshot(&self) -> TranslationView {
        self.lock_view().clone()
    }

    fn lock_view(&self) -> MutexGuard<'_, TranslationView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a session id and bind the view to it as one step under the view
    /// lock, so concurrent calls bind the view in issue order.
    fn begin(&self) -> (SessionToken, ViewSink) {
        let mut view = self.lock_view();
        let token = self.tracker.begin();
        view.begin(token.id());
        drop(view);
        let sink = ViewSink::new(self.view.clone(), token.id());
        (token, sink)
    }

    /// Abandon whatever translation is in flight.
    pub fn cancel(&self) {
        let mut view = self.lock_view();
        self.tracker.cancel_current();
        if view.is_translating() {
            view.on_failure(&TranslatorError::Cancelled("cancelled by caller".to_string()));
        }
        view.detach();
    }

    /// Stream a translation into the view.
    pub async fn translate_streaming(&self, request: TranslateRequest) -> SessionOutcome {
        let (token, mut sink) = self.begin();
        tracing::debug!(target: "fanyi::view", session = %token.id(), "streaming translation");

        let opened = tokio::select! {
            biased;
            _ = token.cancelled() => return SessionOutcome::Cancelled,
            opened = self.service.translate_stream(&request) => opened,
        };

        match opened {
            Ok(events) => run_session(token, events, sink).await,
            Err(e) => {
                if token.is_current() {
                    sink.on_failure(&e);
                }
                SessionOutcome::TransportFailed(e)
            }
        }
    }

    /// Plain (non-streaming) translation into the view.
    pub async fn translate(&self, request: TranslateRequest) -> Result<TranslateResponse> {
        let (token, mut sink) = self.begin();

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                return Err(TranslatorError::Cancelled("superseded by a newer request".to_string()));
            }
            result = self.service.translate(&request) => result,
        };

        if !token.is_current() {
            return Err(TranslatorError::Cancelled(
                "superseded by a newer request".to_string(),
            ));
        }
        match &result {
            Ok(response) => {
                sink.on_update(&response.translated_text);
                sink.on_complete();
            }
            Err(e) => sink.on_failure(e),
        }
        result
    }
}
