//! Superseded and cancelled sessions must not touch the view again.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fanyi::client::TranslationService;
use fanyi::prelude::*;
use fanyi::streaming::SessionTracker;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::support::stream_fixture::{RecordingSink, SinkCall};

type Chunk = std::result::Result<Vec<u8>, TranslatorError>;

#[derive(Default)]
struct ScriptedService {
    streams: Mutex<VecDeque<UnboundedReceiver<Chunk>>>,
    plain: Mutex<VecDeque<(Duration, String)>>,
}

impl ScriptedService {
    fn with_streams(streams: Vec<UnboundedReceiver<Chunk>>) -> Self {
        Self {
            streams: Mutex::new(streams.into()),
            ..Default::default()
        }
    }

    fn with_plain(responses: Vec<(Duration, &str)>) -> Self {
        Self {
            plain: Mutex::new(
                responses
                    .into_iter()
                    .map(|(d, t)| (d, t.to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
    }
}

#[async_trait]
impl TranslationService for ScriptedService {
    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse> {
        let scripted = self.plain.lock().unwrap().pop_front();
        let (delay, text) = scripted.expect("scripted plain response");
        tokio::time::sleep(delay).await;
        Ok(TranslateResponse {
            translated_text: text,
            source_lang: Some(request.source_lang.clone()),
            target_lang: Some(request.target_lang.clone()),
            model: None,
        })
    }

    async fn translate_stream(&self, _request: &TranslateRequest) -> Result<TranslationStream> {
        let rx = self.streams.lock().unwrap().pop_front();
        let rx = rx.ok_or_else(|| TranslatorError::ConnectionError("connection refused".into()))?;
        let chunks = futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|chunk| (chunk, rx))
        });
        Ok(decode_byte_stream(chunks))
    }
}

/// Streams `update(text)` then `end` without waiting on anything.
struct Immediate(&'static str);

#[async_trait]
impl TranslationService for Immediate {
    async fn translate(&self, _request: &TranslateRequest) -> Result<TranslateResponse> {
        Ok(TranslateResponse {
            translated_text: self.0.to_string(),
            source_lang: None,
            target_lang: None,
            model: None,
        })
    }

    async fn translate_stream(&self, _request: &TranslateRequest) -> Result<TranslationStream> {
        let events = vec![
            Ok(TranslationStreamEvent::update(self.0)),
            Ok(TranslationStreamEvent::End),
        ];
        Ok(Box::pin(futures_util::stream::iter(events)))
    }
}

fn update(text: &str) -> Chunk {
    let event = TranslationStreamEvent::update(text);
    Ok(format!("data: {}\n\n", serde_json::to_string(&event).unwrap()).into_bytes())
}

fn end() -> Chunk {
    Ok(b"data: {\"type\":\"end\"}\n\n".to_vec())
}

fn request(text: &str) -> TranslateRequest {
    TranslateRequest::auto_detect(text, "fr")
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached in time");
}

fn channel() -> (UnboundedSender<Chunk>, UnboundedReceiver<Chunk>) {
    unbounded_channel()
}

#[tokio::test]
async fn newer_stream_supersedes_older_one() {
    let (tx_old, rx_old) = channel();
    let (tx_new, rx_new) = channel();
    let translator = Arc::new(Translator::new(ScriptedService::with_streams(vec![
        rx_old, rx_new,
    ])));

    let first = {
        let translator = translator.clone();
        tokio::spawn(async move { translator.translate_streaming(request("one")).await })
    };
    tx_old.send(update("Old partial")).unwrap();
    wait_for(|| translator.snapshot().text() == "Old partial").await;

    let second = {
        let translator = translator.clone();
        tokio::spawn(async move { translator.translate_streaming(request("two")).await })
    };
    assert_eq!(first.await.unwrap(), SessionOutcome::Cancelled);

    // The old transport keeps delivering; none of it may reach the view.
    let _ = tx_old.send(update("Stale late frame"));
    let _ = tx_old.send(end());

    tx_new.send(update("New")).unwrap();
    tx_new.send(end()).unwrap();
    drop(tx_new);

    assert_eq!(second.await.unwrap(), SessionOutcome::Completed);
    let view = translator.snapshot();
    assert_eq!(view.text(), "New");
    assert_eq!(view.status(), &TranslationStatus::Succeeded);
}

#[tokio::test]
async fn cancelled_session_makes_zero_further_sink_calls() {
    let tracker = SessionTracker::new();
    let token = tracker.begin();
    let (tx, rx) = channel();
    let chunks = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    });
    let sink = RecordingSink::default();

    let task = tokio::spawn(run_session(
        token.clone(),
        decode_byte_stream(chunks),
        sink.clone(),
    ));

    tx.send(update("Hal")).unwrap();
    wait_for(|| !sink.snapshot().calls.is_empty()).await;
    let before = sink.snapshot();

    token.cancel();
    let _ = tx.send(update("Hallo"));
    let _ = tx.send(end());

    assert_eq!(task.await.unwrap(), SessionOutcome::Cancelled);
    assert_eq!(sink.snapshot(), before);
    assert_eq!(before.calls, vec![SinkCall::Update("Hal".into())]);
}

#[tokio::test]
async fn cancel_keeps_partial_text_and_reports_cancellation() {
    let (tx, rx) = channel();
    let translator = Arc::new(Translator::new(ScriptedService::with_streams(vec![rx])));

    let task = {
        let translator = translator.clone();
        tokio::spawn(async move { translator.translate_streaming(request("hello")).await })
    };
    tx.send(update("Bonj")).unwrap();
    wait_for(|| translator.snapshot().text() == "Bonj").await;

    translator.cancel();
    let _ = tx.send(update("Bonjour"));

    assert_eq!(task.await.unwrap(), SessionOutcome::Cancelled);
    let view = translator.snapshot();
    assert_eq!(view.text(), "Bonj");
    assert_eq!(
        view.status(),
        &TranslationStatus::Failed("Translation cancelled".into())
    );
}

#[tokio::test]
async fn failure_before_first_chunk_is_a_single_session_failure() {
    let translator = Translator::new(ScriptedService::default());

    let outcome = translator.translate_streaming(request("hello")).await;

    assert!(matches!(
        outcome,
        SessionOutcome::TransportFailed(TranslatorError::ConnectionError(_))
    ));
    let view = translator.snapshot();
    assert_eq!(view.text(), "");
    assert!(matches!(view.status(), TranslationStatus::Failed(_)));
}

#[tokio::test]
async fn slow_plain_request_is_superseded_by_newer_one() {
    let translator = Arc::new(Translator::new(ScriptedService::with_plain(vec![
        (Duration::from_millis(300), "slow"),
        (Duration::ZERO, "fast"),
    ])));

    let slow = {
        let translator = translator.clone();
        tokio::spawn(async move { translator.translate(request("first")).await })
    };
    wait_for(|| translator.snapshot().is_translating()).await;

    let fast = translator.translate(request("second")).await.unwrap();
    assert_eq!(fast.translated_text, "fast");

    assert!(matches!(
        slow.await.unwrap(),
        Err(TranslatorError::Cancelled(_))
    ));
    let view = translator.snapshot();
    assert_eq!(view.text(), "fast");
    assert_eq!(view.status(), &TranslationStatus::Succeeded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_requests_never_leave_the_view_translating() {
    for round in 0..2_000 {
        let translator = Arc::new(Translator::new(Immediate("x")));

        let calls: Vec<_> = (0..2)
            .map(|i| {
                let translator = translator.clone();
                tokio::spawn(async move {
                    if i == 0 {
                        translator.translate_streaming(request("a")).await;
                    } else {
                        let _ = translator.translate(request("b")).await;
                    }
                })
            })
            .collect();
        for call in calls {
            call.await.unwrap();
        }

        let view = translator.snapshot();
        assert!(
            !view.is_translating(),
            "round {round}: view stuck on {:?}",
            view.session()
        );
        assert_eq!(view.text(), "x");
        assert_eq!(view.status(), &TranslationStatus::Succeeded);
    }
}
