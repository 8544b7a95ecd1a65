use serde_json::Value;

use crate::error::LlmError;
use crate::providers::shared::{
    candidate_slot, carry_forward_delta, delta_base, normalize_role, place_candidate,
};
use crate::types::{Candidate, Candidates, Content, Part, Parts, Role};
use crate::utils::{get_path, get_str, require_array};

/// Top-level response fields copied onto every candidate
const RESPONSE_FIELDS: &[&str] = &["usageMetadata", "modelVersion", "responseId"];

pub(super) fn parse_response(raw: &Value) -> Result<Candidates, LlmError> {
    let candidates = require_array(raw, "candidates")?;
    candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            if get_path(candidate, "content").is_none() {
                return Err(LlmError::MissingField("content".to_string()));
            }
            let (role, parts) = parse_content(candidate)?;
            if parts.is_empty() {
                return Err(LlmError::missing_key(format!(
                    "candidates[{i}].content.parts"
                )));
            }
            let mut out = Candidate::new(Content::new(role, parts));
            copy_metadata(&mut out, candidate, raw);
            Ok(out)
        })
        .collect()
}

/// One streamed `GenerateContentResponse` as a delta.
///
/// Text parts of the chunk are joined into the delta's text fragment; other
/// parts are appended after the ones already streamed for that candidate.
pub(super) fn parse_chunk(
    raw: &Value,
    previous: Option<&Candidates>,
) -> Result<Candidates, LlmError> {
    let mut base = delta_base(previous);
    let listed = raw.get("candidates").and_then(Value::as_array);
    let chunk_candidates: &[Value] = match (listed, previous) {
        (Some(candidates), _) => candidates.as_slice(),
        (None, Some(_)) => &[],
        (None, None) => return Err(LlmError::missing_key("candidates")),
    };

    for (position, candidate) in chunk_candidates.iter().enumerate() {
        let index = match candidate.get("index").and_then(Value::as_u64) {
            Some(index) => candidate_slot(index, base.len())?,
            None => position,
        };
        let (role, parts) = parse_content(candidate)?;

        let mut text = String::new();
        let mut new_parts = Vec::new();
        for part in parts {
            match part {
                Part::Text(fragment) => text.push_str(&fragment),
                other => new_parts.push(other),
            }
        }

        let mut delta = carry_forward_delta(base.get(index), role, text, new_parts);
        copy_metadata(&mut delta, candidate, raw);
        place_candidate(&mut base, index, delta)?;
    }

    if chunk_candidates.is_empty() {
        for delta in &mut base {
            copy_metadata(delta, &Value::Null, raw);
        }
    }
    Ok(Candidates::from(base))
}

fn parse_content(candidate: &Value) -> Result<(Role, Parts), LlmError> {
    let role = match get_str(candidate, "content.role") {
        Some(role) => normalize_role(role)?,
        None => Role::Model,
    };

    let mut parts = Parts::new();
    let Some(raw_parts) = get_path(candidate, "content.parts").and_then(Value::as_array) else {
        return Ok((role, parts));
    };
    for raw_part in raw_parts {
        if raw_part.get("thought").and_then(Value::as_bool) == Some(true) {
            tracing::trace!("skipping gemini thought part");
            continue;
        }
        let mut part = Part::from_value(raw_part)?;
        if let Part::FunctionCall(call) = &mut part {
            if call.id.is_none() {
                call.id = Some(format!("call_{}", uuid::Uuid::new_v4().simple()));
            }
        }
        parts.push(part);
    }
    Ok((role, parts))
}

fn copy_metadata(out: &mut Candidate, candidate: &Value, raw: &Value) {
    if let Some(obj) = candidate.as_object() {
        for (key, value) in obj {
            out.insert_additional(key.clone(), value.clone());
        }
    }
    for key in RESPONSE_FIELDS {
        if let Some(value) = raw.get(*key) {
            out.additional_data
                .entry(key.to_string())
                .or_insert_with(|| value.clone());
        }
    }
}
