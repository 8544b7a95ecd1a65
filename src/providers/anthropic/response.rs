use serde_json::{Map, Value};

use crate::error::LlmError;
use crate::providers::shared::normalize_role;
use crate::types::{Candidate, Content, FunctionCall, Part, Parts, Role};
use crate::utils::{get_str, require_array, require_str};

/// Parse a complete Anthropic message object into a single candidate.
///
/// `content` is required and must yield at least one part. `role` defaults
/// to the model; any other message field ends up in the candidate's
/// additional data.
pub(super) fn parse_message(message: &Value) -> Result<Candidate, LlmError> {
    let candidate = read_message(message)?;
    if candidate.content.parts.is_empty() {
        return Err(LlmError::missing_key("content"));
    }
    Ok(candidate)
}

/// The `message` of a `message_start` chunk, whose content is usually still
/// empty.
pub(super) fn parse_streamed_message(message: &Value) -> Result<Candidate, LlmError> {
    let mut candidate = read_message(message)?;
    if candidate.content.parts.is_empty() {
        candidate.content = Content::streaming_placeholder(candidate.content.role);
    }
    Ok(candidate)
}

fn read_message(message: &Value) -> Result<Candidate, LlmError> {
    let blocks = require_array(message, "content")?;
    let role = match get_str(message, "role") {
        Some(role) => normalize_role(role)?,
        None => Role::Model,
    };

    let mut parts = Parts::new();
    for (i, block) in blocks.iter().enumerate() {
        if let Some(part) = parse_block(block, i)? {
            parts.push(part);
        }
    }

    let mut candidate = Candidate::new(Content::new(role, parts));
    if let Some(obj) = message.as_object() {
        for (key, value) in obj {
            if key != "content" && key != "role" {
                candidate.insert_additional(key.clone(), value.clone());
            }
        }
    }
    Ok(candidate)
}

fn parse_block(block: &Value, index: usize) -> Result<Option<Part>, LlmError> {
    let path = format!("content[{index}]");
    let block_type = require_str(block, "type").map_err(|_| missing(&path, "type"))?;
    match block_type {
        "text" => {
            let text = require_str(block, "text").map_err(|_| missing(&path, "text"))?;
            Ok(Some(Part::text(text)))
        }
        "tool_use" => {
            let id = require_str(block, "id").map_err(|_| missing(&path, "id"))?;
            let name = require_str(block, "name").map_err(|_| missing(&path, "name"))?;
            let args = block
                .get("input")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_else(Map::new);
            Ok(Some(Part::FunctionCall(FunctionCall {
                id: Some(id.to_string()),
                name: name.to_string(),
                args,
            })))
        }
        "thinking" | "redacted_thinking" => {
            tracing::trace!(block_type, index, "skipping anthropic reasoning block");
            Ok(None)
        }
        other => Err(LlmError::UnexpectedContentPart(format!(
            "anthropic content block type `{other}`"
        ))),
    }
}

fn missing(path: &str, key: &str) -> LlmError {
    LlmError::missing_key(format!("{path}.{key}"))
}
