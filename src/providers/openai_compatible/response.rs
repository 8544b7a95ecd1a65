use serde_json::{Map, Value};

use crate::error::LlmError;
use crate::providers::shared::normalize_role;
use crate::types::{Candidate, Candidates, Content, FunctionCall, Part, Parts, Role};
use crate::utils::{get_str, require, require_array};

/// Top-level completion fields copied onto every candidate
pub(super) const RESPONSE_FIELDS: &[&str] =
    &["id", "model", "created", "system_fingerprint", "usage"];

/// Message fields kept as additional data rather than parts
const MESSAGE_FIELDS: &[&str] = &["refusal", "reasoning_content", "annotations", "audio"];

pub(super) fn parse_response(raw: &Value) -> Result<Candidates, LlmError> {
    let choices = require_array(raw, "choices")?;
    choices
        .iter()
        .enumerate()
        .map(|(i, choice)| parse_choice(choice, i, raw))
        .collect()
}

fn parse_choice(choice: &Value, index: usize, raw: &Value) -> Result<Candidate, LlmError> {
    let message = require(choice, "message")
        .map_err(|_| LlmError::missing_key(format!("choices[{index}].message")))?;
    let role = match get_str(message, "role") {
        Some(role) => normalize_role(role)?,
        None => Role::Model,
    };

    let mut parts = Parts::new();
    if let Some(text) = get_str(message, "content") {
        parts.push(Part::text(text));
    }
    if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
        for (j, call) in calls.iter().enumerate() {
            let path = format!("choices[{index}].message.tool_calls[{j}]");
            parts.push(parse_tool_call(call, &path)?);
        }
    }

    if parts.is_empty() {
        return Err(LlmError::missing_key(format!(
            "choices[{index}].message.content"
        )));
    }
    let mut candidate = Candidate::new(Content::new(role, parts));

    if let Some(obj) = choice.as_object() {
        for (key, value) in obj {
            if key != "message" && !value.is_null() {
                candidate.insert_additional(key.clone(), value.clone());
            }
        }
    }
    for key in MESSAGE_FIELDS {
        if let Some(value) = message.get(*key).filter(|v| !v.is_null()) {
            candidate.insert_additional(*key, value.clone());
        }
    }
    copy_response_fields(&mut candidate, raw);
    Ok(candidate)
}

fn parse_tool_call(call: &Value, path: &str) -> Result<Part, LlmError> {
    let name = get_str(call, "function.name")
        .ok_or_else(|| LlmError::missing_key(format!("{path}.function.name")))?;
    let arguments = get_str(call, "function.arguments").unwrap_or("");
    Ok(Part::FunctionCall(FunctionCall {
        id: get_str(call, "id").map(str::to_string),
        name: name.to_string(),
        args: parse_arguments(arguments)?,
    }))
}

/// Decode a JSON-encoded arguments string; empty means no arguments.
pub(super) fn parse_arguments(arguments: &str) -> Result<Map<String, Value>, LlmError> {
    if arguments.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(args)) => Ok(args),
        Ok(other) => Err(LlmError::UnexpectedContentPart(format!(
            "function arguments must be a JSON object, got {other}"
        ))),
        Err(e) => Err(LlmError::UnexpectedContentPart(format!(
            "function arguments are not valid JSON: {e}"
        ))),
    }
}

pub(super) fn copy_response_fields(candidate: &mut Candidate, raw: &Value) {
    for key in RESPONSE_FIELDS {
        if let Some(value) = raw.get(*key).filter(|v| !v.is_null()) {
            candidate.insert_additional(*key, value.clone());
        }
    }
}
