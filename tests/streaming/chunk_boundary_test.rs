//! Chunk-boundary independence: however a well-formed stream is cut into
//! chunks, the decoded events are the same.

use fanyi::streaming::{StreamDecoder, TranslationStreamEvent, decode_byte_stream};
use futures_util::StreamExt;
use proptest::prelude::*;

use crate::support::stream_fixture::{as_byte_stream, split_at_offsets};

fn encode(events: &[TranslationStreamEvent]) -> Vec<u8> {
    let mut out = String::new();
    for event in events {
        out.push_str("data: ");
        out.push_str(&serde_json::to_string(event).unwrap());
        out.push_str("\n\n");
    }
    out.into_bytes()
}

fn event_strategy() -> impl Strategy<Value = TranslationStreamEvent> {
    prop_oneof![
        4 => "[a-zA-Z éüß你好世界🙂\n\"\\\\]{0,24}".prop_map(TranslationStreamEvent::update),
        1 => Just(TranslationStreamEvent::End),
        1 => "[a-z 错误]{1,16}".prop_map(TranslationStreamEvent::error),
    ]
}

fn decode_sync(chunks: &[Vec<u8>]) -> Vec<TranslationStreamEvent> {
    let mut decoder = StreamDecoder::new();
    let mut events = Vec::new();
    for chunk in chunks {
        events.extend(decoder.push(chunk));
    }
    decoder.finish();
    events
}

proptest! {
    #[test]
    fn decoded_events_do_not_depend_on_chunking(
        events in prop::collection::vec(event_strategy(), 0..12),
        offsets in prop::collection::vec(any::<prop::sample::Index>(), 0..16),
    ) {
        let bytes = encode(&events);
        let cuts: Vec<usize> = offsets.iter().map(|i| i.index(bytes.len() + 1)).collect();
        let chunks = split_at_offsets(&bytes, &cuts);

        prop_assert_eq!(decode_sync(&chunks), events.clone());

        let streamed: Vec<TranslationStreamEvent> = futures::executor::block_on(
            decode_byte_stream(as_byte_stream(chunks)).map(|r| r.unwrap()).collect(),
        );
        prop_assert_eq!(streamed, events);
    }

    #[test]
    fn trailing_unterminated_frame_is_never_emitted(
        events in prop::collection::vec(event_strategy(), 0..6),
        tail in "[a-z]{0,10}",
    ) {
        let mut bytes = encode(&events);
        let tail_event = TranslationStreamEvent::update(tail);
        let mut partial = encode(std::slice::from_ref(&tail_event));
        partial.truncate(partial.len() - 2);
        bytes.extend_from_slice(&partial);

        prop_assert_eq!(decode_sync(&[bytes]), events);
    }
}

#[test]
fn split_inside_delimiter_and_multibyte_character() {
    let events = vec![
        TranslationStreamEvent::update("Grüß"),
        TranslationStreamEvent::update("Grüße 🙂"),
        TranslationStreamEvent::End,
    ];
    let bytes = encode(&events);

    let first_delim = bytes.windows(2).position(|w| w == b"\n\n").unwrap();
    let emoji = bytes.iter().position(|b| *b == 0xF0).unwrap();
    let chunks = split_at_offsets(&bytes, &[first_delim + 1, emoji + 1, emoji + 3]);

    assert_eq!(decode_sync(&chunks), events);
}
