use serde_json::{Value, json};

use crate::error::LlmError;
use crate::params::{ParameterConstraints, Transformers};
use crate::providers::shared::function_name_for;
use crate::traits::Params;
use crate::types::{Content, FunctionCallingMode, GenerationConfig, Part, Role};

/// Convert non-system contents to Gemini `contents`.
///
/// Function results travel as `user` turns. A `functionResponse` without a
/// name takes the name of the call with the same id.
pub(super) fn build_contents(contents: &[Content]) -> Result<Vec<Value>, LlmError> {
    contents
        .iter()
        .filter(|content| content.role != Role::System)
        .map(|content| {
            let role = match content.role {
                Role::Model => "model",
                _ => "user",
            };
            let parts = content
                .parts
                .iter()
                .map(|part| convert_part(part, contents))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(json!({ "role": role, "parts": parts }))
        })
        .collect()
}

fn convert_part(part: &Part, history: &[Content]) -> Result<Value, LlmError> {
    match part {
        Part::Text(text) => Ok(json!({ "text": text })),
        Part::InlineData(data) => Ok(json!({
            "inlineData": { "mimeType": data.mime_type, "data": data.base64_payload() }
        })),
        Part::FileData(file) => Ok(json!({
            "fileData": { "mimeType": file.mime_type, "fileUri": file.file_uri }
        })),
        Part::FunctionCall(call) => {
            let mut value = json!({ "name": call.name, "args": call.args });
            if let Some(id) = &call.id {
                value["id"] = json!(id);
            }
            Ok(json!({ "functionCall": value }))
        }
        Part::FunctionResponse(response) => {
            let name = response
                .name
                .as_deref()
                .or_else(|| {
                    response
                        .id
                        .as_deref()
                        .and_then(|id| function_name_for(history, id))
                })
                .ok_or_else(|| {
                    LlmError::invalid_argument(
                        "function response needs a name or the id of an earlier function call",
                    )
                })?;
            let mut value = json!({ "name": name, "response": response.response });
            if let Some(id) = &response.id {
                value["id"] = json!(id);
            }
            Ok(json!({ "functionResponse": value }))
        }
    }
}

/// `systemInstruction` from the system contents' text
pub(super) fn system_instruction(text: &str) -> Value {
    json!({ "parts": [{ "text": text }] })
}

/// Keys of the nested `generationConfig` object.
pub(super) fn generation_config(constraints: &ParameterConstraints) -> Transformers {
    let temperature = constraints.clone();
    let top_p = constraints.clone();

    Transformers::new()
        .with("stopSequences", |c: &GenerationConfig| json!(c.stop_sequences))
        .with("responseMimeType", |c: &GenerationConfig| {
            json!(c.response_mime_type)
        })
        .with("responseSchema", |c: &GenerationConfig| json!(c.response_schema))
        .with("candidateCount", |c: &GenerationConfig| json!(c.candidate_count))
        .with("maxOutputTokens", |c: &GenerationConfig| {
            json!(c.max_output_tokens)
        })
        .with("temperature", move |c: &GenerationConfig| {
            json!(c.temperature.map(|t| temperature.clamp_temperature(t)))
        })
        .with("topP", move |c: &GenerationConfig| {
            json!(c.top_p.map(|p| top_p.clamp_top_p(p)))
        })
        .with("topK", |c: &GenerationConfig| json!(c.top_k))
        .with("presencePenalty", |c: &GenerationConfig| {
            json!(c.presence_penalty)
        })
        .with("frequencyPenalty", |c: &GenerationConfig| {
            json!(c.frequency_penalty)
        })
        .with("responseLogprobs", |c: &GenerationConfig| {
            json!(c.response_logprobs)
        })
        .with("logprobs", |c: &GenerationConfig| json!(c.logprobs))
        .with("responseModalities", |c: &GenerationConfig| {
            json!(c.response_modalities)
        })
}

/// Top-level `tools` and `toolConfig` keys.
pub(super) fn tool_params() -> Transformers {
    Transformers::new()
        .with("tools", |c: &GenerationConfig| {
            if c.function_declarations.is_empty() {
                return Value::Null;
            }
            json!([{ "functionDeclarations": c.function_declarations }])
        })
        .with("toolConfig", |c: &GenerationConfig| {
            match (&c.function_calling, c.function_declarations.is_empty()) {
                (Some(calling), false) => {
                    let mode = match calling.mode {
                        FunctionCallingMode::Auto => "AUTO",
                        FunctionCallingMode::Any => "ANY",
                        FunctionCallingMode::None => "NONE",
                    };
                    let mut config = json!({ "mode": mode });
                    if !calling.allowed_function_names.is_empty() {
                        config["allowedFunctionNames"] = json!(calling.allowed_function_names);
                    }
                    json!({ "functionCallingConfig": config })
                }
                _ => Value::Null,
            }
        })
}

/// Apply the `generationConfig` transformers, keeping explicit nested keys.
pub(super) fn merge_generation_config(
    params: &mut Params,
    constraints: &ParameterConstraints,
    config: &GenerationConfig,
) {
    let explicit = match params.remove("generationConfig") {
        Some(Value::Object(map)) => map,
        _ => Params::new(),
    };
    let merged = generation_config(constraints).apply(explicit, config);
    if !merged.is_empty() {
        params.insert("generationConfig".to_string(), Value::Object(merged));
    }
}
