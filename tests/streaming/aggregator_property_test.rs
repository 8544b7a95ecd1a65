//! Properties of the streaming aggregator

use genai_bridge::prelude::*;
use proptest::prelude::*;
use serde_json::json;

/// Newlines the Anthropic adapter appends when a text block closes
fn block_terminator(text: &str) -> &'static str {
    if text.is_empty() || text.ends_with("\n\n") {
        ""
    } else if text.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    }
}

fn anthropic_payloads(fragments: &[String]) -> Vec<Result<String, LlmError>> {
    let mut payloads = vec![json!({"type": "message_start", "message": {"content": []}})];
    let (first, rest) = fragments.split_first().expect("at least one fragment");
    payloads.push(json!({"type": "content_block_start", "content_block": {"text": first}}));
    for fragment in rest {
        payloads.push(json!({"type": "content_block_delta", "delta": {"text": fragment}}));
    }
    payloads.push(json!({"type": "content_block_stop"}));
    payloads.into_iter().map(|p| Ok(p.to_string())).collect()
}

proptest! {
    #[test]
    fn merged_text_is_concatenation_plus_terminator(
        fragments in prop::collection::vec("[a-z \n]{0,6}", 1..8)
    ) {
        let adapter = AnthropicAdapter::new("claude-3-5-sonnet-latest");
        let merged = stream_candidates(&adapter, anthropic_payloads(&fragments))
            .read_all()
            .unwrap()
            .unwrap();

        let joined: String = fragments.concat();
        let expected = format!("{joined}{}", block_terminator(&joined));
        prop_assert_eq!(merged.first_text(), expected);
    }

    #[test]
    fn complete_is_none_before_exhaustion(
        fragments in prop::collection::vec("[a-z]{1,4}", 1..6)
    ) {
        let adapter = AnthropicAdapter::new("claude-3-5-sonnet-latest");
        let payloads = anthropic_payloads(&fragments);
        let total = payloads.len();
        let mut stream = stream_candidates(&adapter, payloads);

        for _ in 0..total {
            prop_assert!(stream.complete().is_none());
            prop_assert!(stream.next().is_some());
        }
        prop_assert!(stream.complete().is_none());
        prop_assert!(stream.next().is_none());
        prop_assert!(stream.complete().is_some());
    }

    #[test]
    fn explicit_params_are_never_overwritten(temperature in 0.0f64..=1.0, max_tokens in 1u32..4096) {
        let adapter = AnthropicAdapter::new("claude-3-5-sonnet-latest");
        let config = GenerationConfig::new()
            .with_temperature(temperature)
            .with_max_output_tokens(max_tokens)
            .with_param("max_tokens", 7)
            .with_param("temperature", "fixed");
        let params = adapter
            .build_params(&[Content::user_text("hi")], &config)
            .unwrap();
        prop_assert_eq!(&params["max_tokens"], &json!(7));
        prop_assert_eq!(&params["temperature"], &json!("fixed"));
    }
}
