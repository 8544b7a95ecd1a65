//! Async stream aggregation tests

use futures_util::StreamExt;
use genai_bridge::prelude::*;

use crate::support;

#[tokio::test]
async fn async_anthropic_fixture_matches_sync_result() {
    let path = "tests/fixtures/anthropic/message_start_deltas_stop.sse";
    let adapter = AnthropicAdapter::new("claude-3-5-sonnet-latest");

    let bytes = support::load_sse_fixture_as_bytes(path).expect("load fixture");
    let mut stream = stream_candidates_async(&adapter, support::payload_stream(bytes));
    let merged = stream.read_all().await.unwrap().unwrap();

    let expected = stream_candidates(&adapter, support::load_payloads(path))
        .read_all()
        .unwrap()
        .unwrap();
    assert_eq!(merged, expected);
    assert_eq!(stream.complete(), Some(&expected));
}

#[tokio::test]
async fn async_parse_chunk_stream_yields_deltas() {
    let bytes =
        support::load_sse_fixture_as_bytes("tests/fixtures/openai/text_then_tool_call.sse")
            .expect("load fixture");
    let adapter = OpenAiCompatibleAdapter::openai("gpt-4o-mini");

    let deltas: Vec<_> = parse_chunk_stream(&adapter, support::payload_stream(bytes))
        .collect()
        .await;
    // the trailing [DONE] sentinel produces no delta
    assert_eq!(deltas.len(), 7);
    assert!(deltas.iter().all(Result::is_ok));
}

#[tokio::test]
async fn async_complete_waits_for_exhaustion() {
    let bytes =
        support::load_sse_fixture_as_bytes("tests/fixtures/gemini/text_and_function_call.sse")
            .expect("load fixture");
    let adapter = GeminiAdapter::new("gemini-1.5-flash");
    let mut stream = stream_candidates_async(&adapter, support::payload_stream(bytes));

    let mut pulled = 0;
    while let Some(delta) = stream.next().await {
        delta.unwrap();
        pulled += 1;
        assert!(stream.complete().is_none());
    }
    assert_eq!(pulled, 3);
    assert_eq!(stream.complete().unwrap().first_text(), "The weather is sunny.");
}
