//! Gemini streaming fixtures tests

use genai_bridge::prelude::*;
use serde_json::json;

use crate::support;

#[test]
fn gemini_text_and_function_call_fixture() {
    let payloads = support::load_payloads("tests/fixtures/gemini/text_and_function_call.sse");
    let adapter = GeminiAdapter::new("gemini-1.5-flash");
    let merged = stream_candidates(&adapter, payloads).read_all().unwrap().unwrap();

    assert_eq!(merged.len(), 1);
    let candidate = merged.get(0).unwrap();
    assert_eq!(candidate.content.text_content(), "The weather is sunny.");
    assert_eq!(candidate.content.parts.len(), 2);
    match candidate.content.parts.get(1).unwrap() {
        Part::FunctionCall(call) => {
            assert_eq!(call.name, "get_weather");
            assert!(call.id.as_deref().is_some_and(|id| id.starts_with("call_")));
        }
        other => panic!("expected a function call, got {other:?}"),
    }
    assert_eq!(candidate.additional("finishReason"), Some(&json!("STOP")));
    assert_eq!(
        candidate.additional("usageMetadata").unwrap()["totalTokenCount"],
        json!(20)
    );
}

#[test]
fn gemini_first_chunk_needs_candidates() {
    let adapter = GeminiAdapter::new("gemini-1.5-flash");
    let payloads = vec![Ok(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)];
    assert_eq!(
        stream_candidates(&adapter, payloads).read_all().unwrap_err(),
        LlmError::MissingResponseKey("candidates".into())
    );
}

#[test]
fn gemini_streamed_tool_call_matches_full_response() {
    let adapter = GeminiAdapter::new("gemini-1.5-flash");
    let call = r#"{"functionCall":{"id":"c1","name":"get_weather","args":{"city":"Paris"}}}"#;
    let chunk = format!(
        r#"{{"candidates":[{{"content":{{"role":"model","parts":[{call}]}},"finishReason":"STOP","index":0}}]}}"#
    );

    let streamed = stream_candidates(&adapter, vec![Ok(chunk.as_str())])
        .read_all()
        .unwrap()
        .unwrap();
    let full = adapter
        .parse_response(&serde_json::from_str::<serde_json::Value>(&chunk).unwrap())
        .unwrap();

    assert_eq!(
        streamed.get(0).unwrap().content,
        full.get(0).unwrap().content
    );
    assert!(streamed.filter(&PartFilter::kind(PartKind::Text)).is_empty());
}
