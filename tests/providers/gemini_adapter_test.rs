//! Gemini generateContent adapter tests

use genai_bridge::prelude::*;
use serde_json::json;

#[test]
fn build_params_with_tools_and_explicit_generation_config() {
    let adapter = GeminiAdapter::new("gemini-1.5-pro");
    let config = GenerationConfig::new()
        .with_max_output_tokens(512)
        .with_temperature(0.3)
        .with_function(
            FunctionDeclaration::new("get_weather")
                .with_description("Current weather")
                .with_parameters(json!({"type": "object", "properties": {"city": {"type": "string"}}})),
        )
        .with_function_calling(
            FunctionCallingConfig::new(FunctionCallingMode::Any).with_allowed(["get_weather"]),
        )
        .with_param("generationConfig", json!({"temperature": 0.9}))
        .with_param("safetySettings", json!([{"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE"}]));

    let params = adapter
        .build_params(&[Content::user_text("weather in Paris?")], &config)
        .unwrap();

    assert_eq!(params["generationConfig"]["temperature"], json!(0.9));
    assert_eq!(params["generationConfig"]["maxOutputTokens"], json!(512));
    assert_eq!(params["tools"][0]["functionDeclarations"][0]["name"], json!("get_weather"));
    assert_eq!(
        params["toolConfig"],
        json!({"functionCallingConfig": {"mode": "ANY", "allowedFunctionNames": ["get_weather"]}})
    );
    assert!(params.contains_key("safetySettings"));
    assert_eq!(
        params["contents"],
        json!([{"role": "user", "parts": [{"text": "weather in Paris?"}]}])
    );
}

#[test]
fn parse_response_with_multiple_candidates() {
    let adapter = GeminiAdapter::new("gemini-1.5-pro");
    let candidates = adapter
        .parse_response(&json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "one"}]}, "finishReason": "STOP", "index": 0},
                {"content": {"role": "model", "parts": [{"text": "two"}]}, "finishReason": "STOP", "index": 1}
            ],
            "usageMetadata": {"totalTokenCount": 11}
        }))
        .unwrap();

    let texts: Vec<String> = candidates.iter().map(|c| c.content.text_content()).collect();
    assert_eq!(texts, vec!["one", "two"]);
    assert_eq!(candidates.get(1).unwrap().additional("finishReason"), Some(&json!("STOP")));
}

#[test]
fn parse_response_requires_candidates() {
    let adapter = GeminiAdapter::new("gemini-1.5-pro");
    assert_eq!(
        adapter.parse_response(&json!({"promptFeedback": {}})).unwrap_err(),
        LlmError::MissingResponseKey("candidates".into())
    );
}

#[test]
fn streaming_endpoint_is_selected_by_path() {
    let adapter = GeminiAdapter::new("gemini-1.5-pro");
    assert_eq!(
        adapter.endpoint_path(true),
        "models/gemini-1.5-pro:streamGenerateContent?alt=sse"
    );
    let contents = [Content::user_text("hi")];
    let config = GenerationConfig::default();
    assert_eq!(
        adapter.build_stream_params(&contents, &config).unwrap(),
        adapter.build_params(&contents, &config).unwrap()
    );
}
