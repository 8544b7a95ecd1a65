//! OpenAI-compatible and image generation adapter tests

use genai_bridge::prelude::*;
use serde_json::json;

#[test]
fn profiles_differ_in_temperature_and_token_key() {
    let contents = [Content::user_text("hi")];
    let config = GenerationConfig::new()
        .with_temperature(1.8)
        .with_max_output_tokens(64);

    let openai = OpenAiCompatibleAdapter::openai("gpt-4o")
        .build_params(&contents, &config)
        .unwrap();
    assert_eq!(openai["temperature"], json!(1.8));
    assert_eq!(openai["max_completion_tokens"], json!(64));

    let mistral = OpenAiCompatibleAdapter::for_provider("mistral", "mistral-large-latest")
        .unwrap()
        .build_params(&contents, &config)
        .unwrap();
    assert_eq!(mistral["temperature"], json!(1.5));
    assert_eq!(mistral["max_tokens"], json!(64));
}

#[test]
fn builtin_profiles_declare_capabilities() {
    let perplexity = OpenAiCompatibleAdapter::for_provider("perplexity", "sonar").unwrap();
    assert!(!perplexity.capabilities().contains(&CapabilityTag::FunctionCalling));

    let openai = OpenAiCompatibleAdapter::openai("gpt-4o");
    assert!(openai.capabilities().contains(&CapabilityTag::MultimodalInput));
    assert!(openai.capabilities().contains(&CapabilityTag::ChatHistory));
}

#[test]
fn multimodal_user_message() {
    let adapter = OpenAiCompatibleAdapter::openai("gpt-4o");
    let content = Content::new(
        Role::User,
        vec![Part::text("describe"), Part::file_data("image/jpeg", "https://example.com/cat.jpg")],
    );
    let params = adapter
        .build_params(&[content], &GenerationConfig::default())
        .unwrap();
    let parts = params["messages"][0]["content"].as_array().unwrap();
    assert_eq!(parts[0], json!({"type": "text", "text": "describe"}));
    assert_eq!(parts[1]["image_url"]["url"], json!("https://example.com/cat.jpg"));
}

#[test]
fn image_generation_candidates_filter_by_mime_prefix() {
    let adapter = OpenAiImageAdapter::new("gpt-image-1");
    let candidates = adapter
        .parse_response(&json!({"created": 1, "data": [{"b64_json": "aGVsbG8="}, {"b64_json": "d29ybGQ="}]}))
        .unwrap();
    let images = candidates.filter(&PartFilter::kind(PartKind::InlineData).with_mime_prefix("image/"));
    assert_eq!(images.len(), 2);
    assert!(candidates.filter(&PartFilter::kind(PartKind::Text)).is_empty());
}
