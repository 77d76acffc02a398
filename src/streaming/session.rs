//! Decode sessions
//!
//! A session is one attempt to stream a single translation. Sessions are
//! numbered by a [`SessionTracker`]; starting a new one supersedes (and
//! cancels) the previous one. Every sink dispatch re-checks that the session
//! is still current, so late frames from a superseded request are dropped
//! instead of overwriting newer state.
//!
//! Outcome policy:
//! - the first terminal event (`end` or `error`) decides the outcome;
//! - a repeated `end` is swallowed, as is an `end` after an `error`;
//! - once an `error` was applied, later `update`s are ignored;
//! - `update`s after `end` still replace the displayed text;
//! - a stream that finishes without any terminal event is reported as a
//!   failure so the caller never stays in the "translating" state.

use futures_util::{Stream, StreamExt};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

use super::events::TranslationStreamEvent;
use crate::error::{Result, TranslatorError};

/// Applies decoded events to visible state.
pub trait TranslationSink {
    /// Replace the displayed translation with `text`.
    fn on_update(&mut self, text: &str);

    /// The translation completed successfully. Called at most once.
    fn on_complete(&mut self);

    /// The backend reported a failure via an `error` event.
    fn on_error(&mut self, message: &str);

    /// Transport or protocol failure of the session.
    fn on_failure(&mut self, error: &TranslatorError) {
        self.on_error(&error.user_message());
    }
}

impl<T: TranslationSink + ?Sized> TranslationSink for &mut T {
    fn on_update(&mut self, text: &str) {
        (**self).on_update(text);
    }

    fn on_complete(&mut self) {
        (**self).on_complete();
    }

    fn on_error(&mut self, message: &str) {
        (**self).on_error(message);
    }

    fn on_failure(&mut self, error: &TranslatorError) {
        (**self).on_failure(error);
    }
}

/// Monotonic session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct TrackerInner {
    generation: AtomicU64,
    active: Mutex<Option<(SessionId, CancellationToken)>>,
}

/// Hands out session tokens; at most one session is current at a time.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    inner: Arc<TrackerInner>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session, cancelling the one in flight (if any).
    pub fn begin(&self) -> SessionToken {
        let cancel = CancellationToken::new();
        let mut active = self
            .inner
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = SessionId(self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1);
        if let Some((_, previous)) = active.replace((id, cancel.clone())) {
            previous.cancel();
        }
        drop(active);

        tracing::debug!(target: "fanyi::session", session = %id, "session started");
        SessionToken {
            id,
            tracker: self.clone(),
            cancel,
        }
    }

    /// Abandon the current session without starting a new one.
    pub fn cancel_current(&self) {
        let mut active = self
            .inner
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Retires every issued id; the bumped value is never handed out as an id.
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Some((id, previous)) = active.take() {
            tracing::debug!(target: "fanyi::session", session = %id, "session cancelled by caller");
            previous.cancel();
        }
    }

    /// Id of the session in flight; `None` before the first session and
    /// after [`SessionTracker::cancel_current`].
    pub fn current(&self) -> Option<SessionId> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(id, _)| *id)
    }

    pub fn is_current(&self, id: SessionId) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == id.0
    }
}

/// Identity and cancellation handle of one session.
#[derive(Debug, Clone)]
pub struct SessionToken {
    id: SessionId,
    tracker: SessionTracker,
    cancel: CancellationToken,
}

impl SessionToken {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Still the newest session and not cancelled.
    pub fn is_current(&self) -> bool {
        !self.cancel.is_cancelled() && self.tracker.is_current(self.id)
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Resolves once the session is cancelled or superseded.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}

/// Sink wrapper that drops every dispatch once its session is stale.
pub struct GuardedSink<K> {
    token: SessionToken,
    inner: K,
    dropped: u64,
}

impl<K: TranslationSink> GuardedSink<K> {
    pub fn new(token: SessionToken, inner: K) -> Self {
        Self {
            token,
            inner,
            dropped: 0,
        }
    }

    /// Dispatches suppressed because the session was no longer current.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn into_inner(self) -> K {
        self.inner
    }

    fn admit(&mut self) -> bool {
        if self.token.is_current() {
            return true;
        }
        self.dropped += 1;
        tracing::debug!(target: "fanyi::session", session = %self.token.id(), "dropping dispatch from stale session");
        false
    }
}

impl<K: TranslationSink> TranslationSink for GuardedSink<K> {
    fn on_update(&mut self, text: &str) {
        if self.admit() {
            self.inner.on_update(text);
        }
    }

    fn on_complete(&mut self) {
        if self.admit() {
            self.inner.on_complete();
        }
    }

    fn on_error(&mut self, message: &str) {
        if self.admit() {
            self.inner.on_error(message);
        }
    }

    fn on_failure(&mut self, error: &TranslatorError) {
        if self.admit() {
            self.inner.on_failure(error);
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// An `end` event was applied.
    Completed,
    /// An `error` event was applied; carries its message.
    Failed(String),
    /// The transport failed, or the stream ended without a terminal event.
    TransportFailed(TranslatorError),
    /// Superseded or cancelled before finishing.
    Cancelled,
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Per-session completion bookkeeping.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    completed: bool,
    error: Option<String>,
    updates: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn updates_applied(&self) -> u64 {
        self.updates
    }

    fn is_terminated(&self) -> bool {
        self.completed || self.error.is_some()
    }

    /// Apply one event to `sink` following the session outcome policy.
    pub fn apply<K: TranslationSink>(&mut self, event: TranslationStreamEvent, sink: &mut K) {
        match event {
            TranslationStreamEvent::Update { text } => {
                if self.error.is_some() {
                    tracing::debug!(target: "fanyi::session", "ignoring update after error");
                    return;
                }
                self.updates += 1;
                sink.on_update(&text);
            }
            TranslationStreamEvent::End => {
                if self.is_terminated() {
                    tracing::debug!(target: "fanyi::session", "swallowing duplicate completion");
                    return;
                }
                self.completed = true;
                sink.on_complete();
            }
            TranslationStreamEvent::Error { message } => {
                if self.is_terminated() {
                    tracing::debug!(target: "fanyi::session", message = %message, "ignoring error after terminal event");
                    return;
                }
                sink.on_error(&message);
                self.error = Some(message);
            }
            TranslationStreamEvent::Unknown => {}
        }
    }

    fn outcome(&self) -> Option<SessionOutcome> {
        if self.completed {
            Some(SessionOutcome::Completed)
        } else {
            self.error.clone().map(SessionOutcome::Failed)
        }
    }
}

/// Drive `events` to completion, dispatching into `sink`.
///
/// Cancellation is observed both while waiting for the next event and right
/// before each dispatch; a cancelled session makes no further sink calls.
pub async fn run_session<S, K>(token: SessionToken, events: S, sink: K) -> SessionOutcome
where
    S: Stream<Item = Result<TranslationStreamEvent>>,
    K: TranslationSink,
{
    let mut events = std::pin::pin!(events);
    let mut sink = GuardedSink::new(token.clone(), sink);
    let mut state = SessionState::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            next = events.next() => Some(next),
        };

        let Some(next) = next else {
            tracing::debug!(target: "fanyi::session", session = %token.id(), "session cancelled");
            return SessionOutcome::Cancelled;
        };
        if !token.is_current() {
            return SessionOutcome::Cancelled;
        }

        match next {
            Some(Ok(event)) => state.apply(event, &mut sink),
            Some(Err(e)) => {
                return match state.outcome() {
                    Some(outcome) => {
                        tracing::debug!(target: "fanyi::session", error = %e, "transport error after terminal event");
                        outcome
                    }
                    None => {
                        tracing::warn!(target: "fanyi::session", session = %token.id(), error = %e, "translation stream failed");
                        sink.on_failure(&e);
                        SessionOutcome::TransportFailed(e)
                    }
                };
            }
            None => break,
        }
    }

    match state.outcome() {
        Some(outcome) => outcome,
        None => {
            let err = TranslatorError::StreamError(
                "stream ended before the translation finished".to_string(),
            );
            sink.on_failure(&err);
            SessionOutcome::TransportFailed(err)
        }
    }
}
