//! Capability classification, input validation and the adapter registry

use std::sync::Arc;

use genai_bridge::prelude::*;
use genai_bridge::traits::validate_input;
use serde_json::Map;

#[test]
fn classify_ignores_duplicates_and_order() {
    let tags = classify(&[
        ModelOperation::StreamingTextGeneration,
        ModelOperation::ImageGeneration,
        ModelOperation::TextGeneration,
    ]);
    assert_eq!(
        tags.into_iter().collect::<Vec<_>>(),
        vec![CapabilityTag::TextGeneration, CapabilityTag::ImageGeneration]
    );
    assert!(classify(&[]).is_empty());
}

#[test]
fn validate_input_against_adapter_capabilities() {
    let text_only = AnthropicAdapter::new("claude-3-5-haiku-latest")
        .with_operations(vec![ModelOperation::TextGeneration]);
    let caps = text_only.capabilities();

    assert!(validate_input(&caps, &[Content::user_text("hi")]).is_ok());
    assert!(validate_input(&caps, &[]).is_err());
    assert!(
        validate_input(&caps, &[Content::user_text("a"), Content::model_text("b"), Content::user_text("c")])
            .is_err()
    );
    let call = Content::new(Role::Model, vec![Part::function_call("c", "f", Map::new())]);
    assert!(validate_input(&caps, &[call.clone()]).is_err());

    let full = AnthropicAdapter::new("claude-3-5-sonnet-latest").capabilities();
    assert!(validate_input(&full, &[Content::user_text("a"), call]).is_ok());
}

#[test]
fn registry_is_an_explicit_context() {
    let mut registry = AdapterRegistry::new();
    registry
        .register(GeminiAdapter::new("gemini-1.5-flash"))
        .register(OpenAiCompatibleAdapter::for_provider("xai", "grok-2").unwrap());
    let shared: Arc<dyn ProviderAdapter> = Arc::new(OpenAiImageAdapter::new("dall-e-3"));
    registry.register_as("images", shared);

    let adapter = registry.resolve("xai:grok-2").unwrap();
    let params = adapter
        .build_params(&[Content::user_text("hi")], &GenerationConfig::default())
        .unwrap();
    assert_eq!(params["model"], serde_json::json!("grok-2"));

    assert_eq!(
        registry.providers_supporting(CapabilityTag::ImageGeneration),
        vec!["images"]
    );
    assert_eq!(registry.len(), 3);
}
