//! Canonical content model round trips and filtering

use genai_bridge::prelude::*;
use genai_bridge::types::{FunctionCall, FunctionResponse};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

#[test]
fn canonical_contents_round_trip() {
    let mut args = Map::new();
    args.insert("city".into(), json!("Paris"));
    let mut result = Map::new();
    result.insert("temp_c".into(), json!(21));

    let contents = vec![
        Content::system_text("be brief"),
        Content::new(
            Role::User,
            vec![
                Part::text("what is in this image?"),
                Part::inline_data("image/png", "aGVsbG8="),
                Part::file_data("application/pdf", "gs://bucket/doc.pdf"),
            ],
        ),
        Content::new(Role::Model, vec![Part::function_call("call_1", "get_weather", args)]),
        Content::new(Role::Function, vec![Part::function_response("call_1", result)]),
    ];

    for content in contents {
        let value = content.to_value();
        assert_eq!(Content::from_value(&value).unwrap(), content);
        let through_serde: Content = serde_json::from_value(serde_json::to_value(&content).unwrap()).unwrap();
        assert_eq!(through_serde, content);
    }
}

#[test]
fn filter_drops_candidates_without_matching_parts() {
    let candidates = Candidates::from_value(&json!([
        {"content": {"role": "model", "parts": [{"functionCall": {"id": "c1", "name": "lookup", "args": {}}}]}},
        {"content": {"role": "model", "parts": [{"text": "hello"}]}}
    ]))
    .unwrap();

    let texts = candidates.filter(&PartFilter::kind(PartKind::Text));
    assert_eq!(texts.len(), 1);
    assert_eq!(texts.get(0).unwrap().content, Content::model_text("hello"));
}

#[test]
fn unknown_role_and_part_are_rejected() {
    assert!(matches!(
        Content::try_new("narrator", vec![Part::text("x")]),
        Err(LlmError::InvalidRole(_))
    ));
    assert!(matches!(
        Part::from_value(&json!({"executableCode": {"code": "1+1"}})),
        Err(LlmError::UnexpectedContentPart(_))
    ));
}

#[test]
fn indexed_access_is_bounds_checked() {
    let parts = Parts::from(vec![Part::text("only")]);
    assert_eq!(
        parts.get(3).unwrap_err(),
        LlmError::IndexOutOfBounds { index: 3, len: 1 }
    );
}

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,12}".prop_map(Value::from),
    ]
}

fn json_map() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z_]{1,8}", json_leaf(), 0..4)
        .prop_map(|entries| entries.into_iter().collect())
}

fn any_part() -> impl Strategy<Value = Part> {
    let mime = "(image|audio|application)/[a-z]{1,8}";
    prop_oneof![
        ".{0,24}".prop_map(Part::text),
        (mime, "[A-Za-z0-9+/]{0,16}").prop_map(|(mime, data)| Part::inline_data(mime, data)),
        (mime, "gs://[a-z]{1,8}/[a-z.]{0,12}").prop_map(|(mime, uri)| Part::file_data(mime, uri)),
        (
            proptest::option::of("call_[a-z0-9]{1,8}"),
            "[a-z_]{1,12}",
            json_map()
        )
            .prop_map(|(id, name, args)| Part::FunctionCall(FunctionCall { id, name, args })),
        (
            proptest::option::of("call_[a-z0-9]{1,8}"),
            proptest::option::of("[a-z_]{1,12}"),
            json_map()
        )
            .prop_map(|(id, name, response)| {
                Part::FunctionResponse(FunctionResponse { id, name, response })
            }),
    ]
}

fn any_content() -> impl Strategy<Value = Content> {
    let role = prop_oneof![
        Just(Role::User),
        Just(Role::Model),
        Just(Role::System),
        Just(Role::Function),
    ];
    (role, prop::collection::vec(any_part(), 0..6))
        .prop_map(|(role, parts)| Content::new(role, parts))
}

proptest! {
    #[test]
    fn any_content_round_trips(content in any_content()) {
        let value = content.to_value();
        prop_assert_eq!(Content::from_value(&value).unwrap(), content.clone());
        let through_serde: Content = serde_json::from_value(serde_json::to_value(&content).unwrap()).unwrap();
        prop_assert_eq!(through_serde, content);
    }
}
