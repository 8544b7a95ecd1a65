use serde_json::{Value, json};

use crate::error::LlmError;
use crate::params::{ParameterConstraints, Transformers};
use crate::types::{Content, FunctionCallingMode, GenerationConfig, Part, Role};

/// Convert non-system contents to Anthropic `messages`.
pub(super) fn build_messages(contents: &[Content]) -> Result<Vec<Value>, LlmError> {
    contents
        .iter()
        .filter(|content| content.role != Role::System)
        .map(|content| {
            let role = match content.role {
                Role::Model => "assistant",
                _ => "user",
            };
            let blocks = content
                .parts
                .iter()
                .map(convert_part)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(json!({ "role": role, "content": blocks }))
        })
        .collect()
}

fn convert_part(part: &Part) -> Result<Value, LlmError> {
    match part {
        Part::Text(text) => Ok(json!({ "type": "text", "text": text })),
        Part::InlineData(data) => {
            let block_type = media_block_type(&data.mime_type)?;
            Ok(json!({
                "type": block_type,
                "source": {
                    "type": "base64",
                    "media_type": data.mime_type,
                    "data": data.base64_payload(),
                },
            }))
        }
        Part::FileData(file) => {
            let block_type = media_block_type(&file.mime_type)?;
            Ok(json!({
                "type": block_type,
                "source": { "type": "url", "url": file.file_uri },
            }))
        }
        Part::FunctionCall(call) => {
            let id = call.id.as_deref().ok_or_else(|| {
                LlmError::invalid_argument(format!(
                    "function call `{}` needs an id for tool_use",
                    call.name
                ))
            })?;
            Ok(json!({
                "type": "tool_use",
                "id": id,
                "name": call.name,
                "input": call.args,
            }))
        }
        Part::FunctionResponse(response) => {
            let id = response.id.as_deref().ok_or_else(|| {
                LlmError::invalid_argument("function response needs an id for tool_result")
            })?;
            Ok(json!({
                "type": "tool_result",
                "tool_use_id": id,
                "content": Value::Object(response.response.clone()).to_string(),
            }))
        }
    }
}

fn media_block_type(mime_type: &str) -> Result<&'static str, LlmError> {
    if mime_type.starts_with("image/") {
        Ok("image")
    } else if mime_type == "application/pdf" {
        Ok("document")
    } else {
        Err(LlmError::unsupported_part(format!(
            "anthropic accepts images and PDF documents, got {mime_type}"
        )))
    }
}

/// Derived request keys.
///
/// `max_tokens` is required by the API and falls back to the configured
/// default. Temperature and top_p are clamped, zero passes through.
pub(super) fn transformers(constraints: &ParameterConstraints) -> Transformers {
    let default_max_tokens = constraints.default_max_tokens;
    let temperature = constraints.clone();
    let top_p = constraints.clone();

    Transformers::new()
        .with("max_tokens", move |c: &GenerationConfig| {
            json!(c.max_output_tokens.or(default_max_tokens))
        })
        .with("temperature", move |c: &GenerationConfig| {
            json!(c.temperature.map(|t| temperature.clamp_temperature(t)))
        })
        .with("top_p", move |c: &GenerationConfig| {
            json!(c.top_p.map(|p| top_p.clamp_top_p(p)))
        })
        .with("top_k", |c: &GenerationConfig| json!(c.top_k))
        .with("stop_sequences", |c: &GenerationConfig| {
            json!(c.stop_sequences)
        })
        .with("tools", tools)
        .with("tool_choice", tool_choice)
}

fn tools(config: &GenerationConfig) -> Value {
    config
        .function_declarations
        .iter()
        .map(|decl| {
            let mut tool = json!({
                "name": decl.name,
                "input_schema": decl
                    .parameters
                    .clone()
                    .unwrap_or_else(|| json!({ "type": "object", "properties": {} })),
            });
            if let Some(description) = &decl.description {
                tool["description"] = json!(description);
            }
            tool
        })
        .collect()
}

fn tool_choice(config: &GenerationConfig) -> Value {
    let Some(calling) = &config.function_calling else {
        return Value::Null;
    };
    if config.function_declarations.is_empty() {
        return Value::Null;
    }
    match (calling.mode, calling.allowed_function_names.as_slice()) {
        (FunctionCallingMode::Any, [name]) => json!({ "type": "tool", "name": name }),
        (FunctionCallingMode::Any, _) => json!({ "type": "any" }),
        (FunctionCallingMode::None, _) => json!({ "type": "none" }),
        (FunctionCallingMode::Auto, _) => json!({ "type": "auto" }),
    }
}
