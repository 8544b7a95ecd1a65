//! Chat completion chunk parsing
//!
//! Text arrives as `choices[].delta.content` fragments. Tool calls arrive as
//! argument fragments keyed by `tool_calls[].index`; they are buffered on the
//! in-flight delta and emitted as complete function call parts once the
//! choice reports a finish reason.

use serde::Deserialize;
use serde_json::Value;

use super::response::{copy_response_fields, parse_arguments};
use crate::error::LlmError;
use crate::providers::shared::{
    candidate_slot, carry_forward_delta, delta_base, normalize_role, place_candidate,
};
use crate::types::candidate::PartialFunctionCall;
use crate::types::{Candidates, FunctionCall, Part, Role};
use crate::utils::require;

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    index: u64,
    #[serde(default)]
    delta: StreamDelta,
    finish_reason: Option<String>,
    logprobs: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    role: Option<String>,
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCallDelta>,
}

#[derive(Debug, Deserialize)]
struct ToolCallDelta {
    #[serde(default)]
    index: u64,
    id: Option<String>,
    #[serde(default)]
    function: FunctionDelta,
}

#[derive(Debug, Default, Deserialize)]
struct FunctionDelta {
    name: Option<String>,
    arguments: Option<String>,
}

pub(super) fn parse_chunk(
    raw: &Value,
    previous: Option<&Candidates>,
) -> Result<Candidates, LlmError> {
    require(raw, "choices")?;
    let mut chunk: StreamChunk = serde_json::from_value(raw.clone())
        .map_err(|e| LlmError::UnexpectedChunk(format!("malformed chat completion chunk: {e}")))?;

    chunk.choices.sort_by_key(|choice| choice.index);

    let mut base = delta_base(previous);
    for choice in chunk.choices {
        let index = candidate_slot(choice.index, base.len())?;
        let prev = base.get(index);
        let role = match choice.delta.role.as_deref() {
            Some(role) => normalize_role(role)?,
            None => prev.map_or(Role::Model, |p| p.content.role),
        };

        let mut pending = prev
            .map(|p| p.stream_state.partial_calls.clone())
            .unwrap_or_default();
        for fragment in choice.delta.tool_calls {
            buffer_fragment(&mut pending, fragment);
        }

        let mut new_parts = Vec::new();
        if choice.finish_reason.is_some() {
            for call in pending.drain(..) {
                new_parts.push(finish_call(call)?);
            }
        }

        let text = choice.delta.content.unwrap_or_default();
        let mut delta = carry_forward_delta(prev, role, text, new_parts);
        delta.stream_state.partial_calls = pending;
        delta.insert_additional("index", choice.index.into());
        if let Some(reason) = choice.finish_reason {
            delta.insert_additional("finish_reason", Value::String(reason));
        }
        if let Some(logprobs) = choice.logprobs {
            delta.insert_additional("logprobs", logprobs);
        }
        place_candidate(&mut base, index, delta)?;
    }

    for delta in &mut base {
        copy_response_fields(delta, raw);
    }
    Ok(Candidates::from(base))
}

fn buffer_fragment(pending: &mut Vec<PartialFunctionCall>, fragment: ToolCallDelta) {
    let position = match pending.iter().position(|c| c.index == fragment.index) {
        Some(position) => position,
        None => {
            pending.push(PartialFunctionCall {
                index: fragment.index,
                ..Default::default()
            });
            pending.len() - 1
        }
    };
    let call = &mut pending[position];
    if let Some(id) = fragment.id.filter(|id| !id.is_empty()) {
        call.id = Some(id);
    }
    if let Some(name) = fragment.function.name {
        call.name.push_str(&name);
    }
    if let Some(arguments) = fragment.function.arguments {
        call.arguments.push_str(&arguments);
    }
}

fn finish_call(call: PartialFunctionCall) -> Result<Part, LlmError> {
    tracing::debug!(name = %call.name, index = call.index, "streamed tool call complete");
    Ok(Part::FunctionCall(FunctionCall {
        id: Some(
            call.id
                .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple())),
        ),
        name: call.name,
        args: parse_arguments(&call.arguments)?,
    }))
}
