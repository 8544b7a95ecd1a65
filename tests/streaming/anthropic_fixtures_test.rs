//! Anthropic streaming fixtures tests

use genai_bridge::prelude::*;
use serde_json::json;

use crate::support;

fn adapter() -> AnthropicAdapter {
    AnthropicAdapter::new("claude-3-5-sonnet-latest")
}

#[test]
fn anthropic_message_start_deltas_stop_fixture() {
    let payloads = support::load_payloads("tests/fixtures/anthropic/message_start_deltas_stop.sse");
    assert_eq!(payloads.len(), 7);

    let adapter = adapter();
    let mut deltas = Vec::new();
    let merged = stream_candidates(&adapter, payloads)
        .read_all_with(|delta| deltas.push(delta.first_text()))
        .expect("stream ok")
        .expect("at least one chunk");

    assert_eq!(deltas, vec!["", "", "Hello", " world", "\n\n", "", ""]);
    assert_eq!(merged.len(), 1);

    let candidate = merged.get(0).unwrap();
    assert_eq!(candidate.content.role, Role::Model);
    assert_eq!(candidate.content.text_content(), "Hello world\n\n");
    assert_eq!(candidate.additional("stop_reason"), Some(&json!("end_turn")));
    assert_eq!(candidate.additional("usage"), Some(&json!({"output_tokens": 7})));
    assert_eq!(
        candidate.additional("id"),
        Some(&json!("msg_01XFDUDYJgAACzvnptvVoYEL"))
    );
}

#[test]
fn anthropic_each_block_is_terminated_once() {
    let payloads = support::load_payloads("tests/fixtures/anthropic/two_text_blocks.sse");
    let adapter = adapter();
    let merged = stream_candidates(&adapter, payloads)
        .read_all()
        .unwrap()
        .unwrap();
    assert_eq!(merged.first_text(), "First.\n\nSecond line\n\n");
}

#[test]
fn anthropic_stream_must_start_with_message_start() {
    let adapter = adapter();
    let payloads = vec![Ok(r#"{"type":"content_block_delta","delta":{"text":"hi"}}"#)];
    assert!(matches!(
        stream_candidates(&adapter, payloads).read_all(),
        Err(LlmError::UnexpectedChunk(_))
    ));
}

#[test]
fn anthropic_unknown_chunk_type_fails() {
    let adapter = adapter();
    let payloads = vec![
        Ok(r#"{"type":"message_start","message":{"content":[]}}"#),
        Ok(r#"{"type":"ping"}"#),
    ];
    let mut stream = stream_candidates(&adapter, payloads);
    assert!(matches!(stream.read_all(), Err(LlmError::UnexpectedChunk(_))));
    assert!(stream.complete().is_none());
}

#[test]
fn anthropic_missing_delta_text_fails_with_path() {
    let adapter = adapter();
    let payloads = vec![
        Ok(r#"{"type":"message_start","message":{"content":[]}}"#),
        Ok(r#"{"type":"content_block_delta","delta":{}}"#),
    ];
    let mut stream = stream_candidates(&adapter, payloads);
    assert_eq!(
        stream.read_all().unwrap_err(),
        LlmError::MissingResponseKey("delta.text".into())
    );
    assert!(stream.into_complete().is_none());
}
