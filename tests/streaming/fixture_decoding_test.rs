use fanyi::streaming::{
    SessionOutcome, SessionTracker, StreamDecoder, TranslationStreamEvent, decode_byte_stream,
    run_session,
};
use futures_util::StreamExt;

use crate::support::stream_fixture::{
    RecordingSink, SinkCall, as_byte_stream, load_fixture, split_at_offsets,
};

fn decode_all(chunks: &[Vec<u8>]) -> Vec<TranslationStreamEvent> {
    let mut decoder = StreamDecoder::new();
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(decoder.push(chunk));
    }
    decoder.finish();
    events
}

#[tokio::test]
async fn bonjour_fixture_shows_final_text_and_single_success() {
    let bytes = load_fixture("bonjour.sse");
    let sink = RecordingSink::default();
    let tracker = SessionTracker::new();

    let events = decode_byte_stream(as_byte_stream(vec![bytes]));
    let outcome = run_session(tracker.begin(), events, sink.clone()).await;

    assert_eq!(outcome, SessionOutcome::Completed);
    let rec = sink.snapshot();
    assert_eq!(rec.displayed_text(), Some("Bonjour"));
    assert_eq!(rec.completions(), 1);
}

#[tokio::test]
async fn noisy_fixture_skips_junk_and_swallows_second_end() {
    let bytes = load_fixture("noisy.sse");
    let sink = RecordingSink::default();
    let tracker = SessionTracker::new();

    let events = decode_byte_stream(as_byte_stream(vec![bytes]));
    let outcome = run_session(tracker.begin(), events, sink.clone()).await;

    assert_eq!(outcome, SessionOutcome::Completed);
    assert_eq!(
        sink.snapshot().calls,
        vec![
            SinkCall::Update("你".into()),
            SinkCall::Update("你好".into()),
            SinkCall::Update("你好，世界".into()),
            SinkCall::Complete,
        ]
    );
}

#[test]
fn every_two_way_split_of_noisy_fixture_decodes_identically() {
    let bytes = load_fixture("noisy.sse");
    let expected = decode_all(&[bytes.clone()]);
    assert_eq!(
        expected,
        vec![
            TranslationStreamEvent::update("你"),
            TranslationStreamEvent::update("你好"),
            TranslationStreamEvent::update("你好，世界"),
            TranslationStreamEvent::End,
            TranslationStreamEvent::End,
        ]
    );

    for cut in 0..=bytes.len() {
        let chunks = split_at_offsets(&bytes, &[cut]);
        assert_eq!(decode_all(&chunks), expected, "split at byte {cut}");
    }
}

#[test]
fn byte_by_byte_delivery_decodes_identically() {
    let bytes = load_fixture("bonjour.sse");
    let chunks: Vec<Vec<u8>> = bytes.iter().map(|b| vec![*b]).collect();
    assert_eq!(decode_all(&chunks), decode_all(&[bytes]));
}

#[tokio::test]
async fn stream_is_lazy_and_ordered() {
    let bytes = load_fixture("bonjour.sse");
    let mut events = decode_byte_stream(as_byte_stream(split_at_offsets(&bytes, &[5, 40, 41])));

    let mut seen = Vec::new();
    while let Some(item) = events.next().await {
        seen.push(item.unwrap());
    }
    assert_eq!(
        seen,
        vec![
            TranslationStreamEvent::update("Bonj"),
            TranslationStreamEvent::update("Bonjour"),
            TranslationStreamEvent::End,
        ]
    );
}
