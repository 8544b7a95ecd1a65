use serde_json::{Value, json};

use super::profiles::OpenAiCompatibleProfile;
use crate::error::LlmError;
use crate::params::{ParameterConstraints, Transformers};
use crate::providers::shared::{prepare_function_calling_params, prepare_multimodal_parts};
use crate::types::{Content, GenerationConfig, Part, Parts, Role};

/// Convert contents to chat completion `messages`.
///
/// Function responses become `tool` messages regardless of the content's
/// role. Text-only content is sent as a plain string, which every compatible
/// vendor accepts; anything else as a content array.
pub(super) fn build_messages(
    contents: &[Content],
    profile: &OpenAiCompatibleProfile,
) -> Result<Vec<Value>, LlmError> {
    let mut messages = Vec::with_capacity(contents.len());
    for content in contents {
        let (responses, rest): (Vec<&Part>, Vec<&Part>) = content
            .parts
            .iter()
            .partition(|part| matches!(part, Part::FunctionResponse(_)));
        let rest: Parts = rest.into_iter().cloned().collect();

        match content.role {
            Role::System => messages.push(json!({
                "role": "system",
                "content": text_only(&rest, "system")?,
            })),
            Role::User if !rest.is_empty() => messages.push(json!({
                "role": "user",
                "content": user_content(&rest, profile)?,
            })),
            Role::Model if !rest.is_empty() => messages.push(assistant_message(&rest)?),
            Role::Function if !rest.is_empty() => {
                return Err(LlmError::unsupported_part(
                    "function contents may only carry function responses",
                ));
            }
            _ => {}
        }

        for part in responses {
            if let Part::FunctionResponse(response) = part {
                let id = response.id.as_deref().ok_or_else(|| {
                    LlmError::invalid_argument("function response needs the id of its tool call")
                })?;
                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": id,
                    "content": Value::Object(response.response.clone()).to_string(),
                }));
            }
        }
    }
    Ok(messages)
}

fn text_only(parts: &Parts, role: &str) -> Result<String, LlmError> {
    if let Some(part) = parts.iter().find(|p| !matches!(p, Part::Text(_))) {
        return Err(LlmError::unsupported_part(format!(
            "{role} messages only accept text, got {}",
            part.kind()
        )));
    }
    Ok(parts.text())
}

fn user_content(parts: &Parts, profile: &OpenAiCompatibleProfile) -> Result<Value, LlmError> {
    if parts.iter().all(|p| matches!(p, Part::Text(_))) {
        return Ok(json!(parts.text()));
    }
    let has_image = parts
        .iter()
        .any(|p| p.mime_type().is_some_and(|m| m.starts_with("image/")));
    if has_image && !profile.supports_image_input {
        return Err(LlmError::unsupported_part(format!(
            "{} does not accept image input",
            profile.id
        )));
    }
    Ok(Value::Array(prepare_multimodal_parts(
        parts,
        profile.supports_audio_input,
    )?))
}

fn assistant_message(parts: &Parts) -> Result<Value, LlmError> {
    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for part in parts {
        match part {
            Part::Text(fragment) => text.push_str(fragment),
            Part::FunctionCall(call) => {
                let id = call.id.as_deref().ok_or_else(|| {
                    LlmError::invalid_argument(format!(
                        "function call `{}` needs an id",
                        call.name
                    ))
                })?;
                tool_calls.push(json!({
                    "id": id,
                    "type": "function",
                    "function": {
                        "name": call.name,
                        "arguments": Value::Object(call.args.clone()).to_string(),
                    },
                }));
            }
            other => {
                return Err(LlmError::unsupported_part(format!(
                    "assistant messages cannot carry {}",
                    other.kind()
                )));
            }
        }
    }

    let content = if text.is_empty() && !tool_calls.is_empty() {
        Value::Null
    } else {
        json!(text)
    };
    let mut message = json!({ "role": "assistant", "content": content });
    if !tool_calls.is_empty() {
        message["tool_calls"] = Value::Array(tool_calls);
    }
    Ok(message)
}

/// Derived request keys.
///
/// Zero temperature and zero penalties pass through; empty lists do not.
pub(super) fn transformers(profile: &OpenAiCompatibleProfile) -> Transformers {
    let constraints =
        ParameterConstraints::default().with_temperature_max(profile.max_temperature);
    let top_p = constraints.clone();

    Transformers::new()
        .with(profile.max_tokens_key.clone(), |c: &GenerationConfig| {
            json!(c.max_output_tokens)
        })
        .with("temperature", move |c: &GenerationConfig| {
            json!(c.temperature.map(|t| constraints.clamp_temperature(t)))
        })
        .with("top_p", move |c: &GenerationConfig| {
            json!(c.top_p.map(|p| top_p.clamp_top_p(p)))
        })
        .with("stop", |c: &GenerationConfig| json!(c.stop_sequences))
        .with("n", |c: &GenerationConfig| json!(c.candidate_count))
        .with("presence_penalty", |c: &GenerationConfig| {
            json!(c.presence_penalty)
        })
        .with("frequency_penalty", |c: &GenerationConfig| {
            json!(c.frequency_penalty)
        })
        .with("logprobs", |c: &GenerationConfig| json!(c.response_logprobs))
        .with("top_logprobs", |c: &GenerationConfig| json!(c.logprobs))
        .with("response_format", response_format)
        .with("modalities", |c: &GenerationConfig| {
            c.response_modalities
                .iter()
                .map(|m| json!(m.to_lowercase()))
                .collect::<Value>()
        })
        .with("tools", |c: &GenerationConfig| {
            prepare_function_calling_params(c)
                .remove("tools")
                .unwrap_or(Value::Null)
        })
        .with("tool_choice", |c: &GenerationConfig| {
            prepare_function_calling_params(c)
                .remove("tool_choice")
                .unwrap_or(Value::Null)
        })
}

fn response_format(config: &GenerationConfig) -> Value {
    match (&config.response_schema, config.wants_json()) {
        (Some(schema), _) => json!({
            "type": "json_schema",
            "json_schema": { "name": "response", "schema": schema },
        }),
        (None, true) => json!({ "type": "json_object" }),
        (None, false) => Value::Null,
    }
}
