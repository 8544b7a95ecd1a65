//! Anthropic Messages adapter tests

use genai_bridge::prelude::*;
use serde_json::{Map, json};

#[test]
fn parse_response_yields_model_text() {
    let adapter = AnthropicAdapter::new("claude-3-5-sonnet-latest");
    let params = adapter
        .build_params(&[Content::user_text("hi")], &GenerationConfig::default())
        .unwrap();
    assert_eq!(params["messages"], json!([{"role": "user", "content": [{"type": "text", "text": "hi"}]}]));

    let candidates = adapter
        .parse_response(&json!({"content": [{"type": "text", "text": "hello"}]}))
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates.get(0).unwrap().content, Content::model_text("hello"));
}

#[test]
fn tool_use_round_trip() {
    let adapter = AnthropicAdapter::new("claude-3-5-sonnet-latest");
    let candidates = adapter
        .parse_response(&json!({
            "id": "msg_1",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Checking."},
                {"type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {"city": "Paris"}}
            ],
            "stop_reason": "tool_use"
        }))
        .unwrap();
    let reply = candidates.get(0).unwrap().content.clone();
    assert_eq!(candidates.get(0).unwrap().additional("stop_reason"), Some(&json!("tool_use")));

    let mut result = Map::new();
    result.insert("temp_c".into(), json!(21));
    let contents = vec![
        Content::user_text("weather in Paris?"),
        reply,
        Content::new(Role::Function, vec![Part::function_response("toolu_1", result)]),
    ];
    let params = adapter
        .build_params(&contents, &GenerationConfig::default())
        .unwrap();

    let messages = params["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["role"], json!("assistant"));
    assert_eq!(messages[1]["content"][1]["type"], json!("tool_use"));
    assert_eq!(messages[2]["role"], json!("user"));
    assert_eq!(messages[2]["content"][0]["type"], json!("tool_result"));
    assert_eq!(messages[2]["content"][0]["tool_use_id"], json!("toolu_1"));
}

#[test]
fn unsupported_media_is_rejected() {
    let adapter = AnthropicAdapter::new("claude-3-5-sonnet-latest");
    let content = Content::new(Role::User, vec![Part::inline_data("audio/wav", "UklGRg==")]);
    assert!(matches!(
        adapter.build_params(&[content], &GenerationConfig::default()),
        Err(LlmError::UnsupportedPart(_))
    ));
}

#[test]
fn invalid_config_is_rejected_before_building() {
    let adapter = AnthropicAdapter::new("claude-3-5-sonnet-latest");
    let config = GenerationConfig::new().with_temperature(3.5);
    assert!(matches!(
        adapter.build_params(&[Content::user_text("hi")], &config),
        Err(LlmError::InvalidArgument(_))
    ));
}
