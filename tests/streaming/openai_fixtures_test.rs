//! OpenAI-compatible streaming fixtures tests

use genai_bridge::prelude::*;
use genai_bridge::types::FunctionCall;
use serde_json::json;

use crate::support;

#[test]
fn openai_text_then_tool_call_fixture() {
    let payloads = support::load_payloads("tests/fixtures/openai/text_then_tool_call.sse");
    let adapter = OpenAiCompatibleAdapter::openai("gpt-4o-mini");

    let mut tool_call_deltas = 0;
    let merged = stream_candidates(&adapter, payloads)
        .read_all_with(|delta| {
            let calls = delta.filter(&PartFilter::kind(PartKind::FunctionCall));
            tool_call_deltas += calls.len();
        })
        .unwrap()
        .unwrap();

    let candidate = merged.get(0).unwrap();
    assert_eq!(candidate.content.text_content(), "Let me check.");
    assert_eq!(candidate.content.parts.len(), 2);
    match candidate.content.parts.get(1).unwrap() {
        Part::FunctionCall(FunctionCall { id, name, args }) => {
            assert_eq!(id.as_deref(), Some("call_abc"));
            assert_eq!(name, "get_weather");
            assert_eq!(args.get("city"), Some(&json!("Paris")));
        }
        other => panic!("expected a function call, got {other:?}"),
    }
    assert_eq!(candidate.additional("finish_reason"), Some(&json!("tool_calls")));
    assert_eq!(candidate.additional("usage").unwrap()["total_tokens"], json!(30));
    assert_eq!(candidate.additional("model"), Some(&json!("gpt-4o-mini")));

    // the call is carried forward by the trailing usage chunk as well
    assert_eq!(tool_call_deltas, 2);
}

#[test]
fn openai_malformed_arguments_fail_the_stream() {
    let adapter = OpenAiCompatibleAdapter::openai("gpt-4o-mini");
    let payloads = vec![
        Ok(r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"id":"c","function":{"name":"f","arguments":"{oops"}}]}}]}"#),
        Ok(r#"{"choices":[{"index":0,"delta":{},"finish_reason":"tool_calls"}]}"#),
    ];
    let mut stream = stream_candidates(&adapter, payloads);
    assert!(stream.next().unwrap().is_ok());
    assert!(matches!(
        stream.next(),
        Some(Err(LlmError::UnexpectedContentPart(_)))
    ));
    assert!(stream.next().is_none());
}

#[test]
fn openai_two_choices_stream_side_by_side() {
    let adapter = OpenAiCompatibleAdapter::for_provider("deepseek", "deepseek-chat").unwrap();
    let payloads = vec![
        Ok(r#"{"choices":[{"index":0,"delta":{"content":"A"}},{"index":1,"delta":{"content":"X"}}]}"#),
        Ok(r#"{"choices":[{"index":1,"delta":{"content":"Y"}}]}"#),
        Ok(r#"{"choices":[{"index":0,"delta":{"content":"B"},"finish_reason":"stop"}]}"#),
    ];
    let merged = stream_candidates(&adapter, payloads).read_all().unwrap().unwrap();
    let texts: Vec<String> = merged.iter().map(|c| c.content.text_content()).collect();
    assert_eq!(texts, vec!["AB", "XY"]);
}

#[test]
fn openai_streamed_tool_call_matches_full_response() {
    let adapter = OpenAiCompatibleAdapter::openai("gpt-4o-mini");
    let payloads = vec![
        Ok(r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":null,"tool_calls":[{"index":0,"id":"call_1","type":"function","function":{"name":"search","arguments":"{\"q\":"}}]}}]}"#),
        Ok(r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"function":{"arguments":"\"rust\"}"}}]}}]}"#),
        Ok(r#"{"choices":[{"index":0,"delta":{},"finish_reason":"tool_calls"}]}"#),
    ];
    let streamed = stream_candidates(&adapter, payloads).read_all().unwrap().unwrap();

    let full = adapter
        .parse_response(&json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "search", "arguments": "{\"q\":\"rust\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

    assert_eq!(
        streamed.get(0).unwrap().content,
        full.get(0).unwrap().content
    );
    assert!(streamed.filter(&PartFilter::kind(PartKind::Text)).is_empty());
    assert_eq!(
        streamed.filter(&PartFilter::kind(PartKind::FunctionCall)).len(),
        1
    );
}
