//! Helpers shared across adapters
//!
//! Each adapter calls these explicitly; there is no layered adapter
//! inheritance. The OpenAI-style helpers are used by every adapter that
//! speaks the chat-completions dialect.

use serde_json::{Value, json};

use crate::error::LlmError;
use crate::traits::Params;
use crate::types::{
    Candidate, Candidates, Content, FunctionCallingMode, GenerationConfig, Part, PartKind, Parts,
    Role,
};
use crate::utils::media;

/// Keys an adapter owns outright; `additional_params` may not override them.
pub(crate) const RESERVED_KEYS: &[&str] = &["model", "messages", "contents", "stream"];

/// Seed params with the caller's explicit vendor keys.
pub(crate) fn explicit_params(config: &GenerationConfig) -> Params {
    config
        .additional_params
        .iter()
        .filter(|(k, v)| !RESERVED_KEYS.contains(&k.as_str()) && !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Every content sent in a request must be a complete message.
pub(crate) fn ensure_complete(contents: &[Content]) -> Result<(), LlmError> {
    if contents.is_empty() {
        return Err(LlmError::invalid_argument("at least one content is required"));
    }
    if let Some(pos) = contents.iter().position(|c| c.parts.is_empty()) {
        return Err(LlmError::invalid_argument(format!(
            "content at index {pos} has no parts"
        )));
    }
    Ok(())
}

/// Concatenated text of all system contents; system parts must be text.
pub(crate) fn system_instruction(contents: &[Content]) -> Result<Option<String>, LlmError> {
    let mut texts = Vec::new();
    for content in contents.iter().filter(|c| c.role == Role::System) {
        for part in &content.parts {
            match part {
                Part::Text(text) => texts.push(text.as_str()),
                other => {
                    return Err(LlmError::unsupported_part(format!(
                        "system instructions only accept text, got {}",
                        other.kind()
                    )));
                }
            }
        }
    }
    Ok(if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n\n"))
    })
}

/// Name of the function call with the given id, searching earlier contents.
pub(crate) fn function_name_for<'a>(contents: &'a [Content], id: &str) -> Option<&'a str> {
    contents
        .iter()
        .flat_map(|c| c.parts.iter())
        .find_map(|part| match part {
            Part::FunctionCall(call) if call.id.as_deref() == Some(id) => Some(call.name.as_str()),
            _ => None,
        })
}

/// Map a vendor role string onto the canonical roles.
///
/// Unrecognized roles fail `InvalidArgument`.
pub(crate) fn normalize_role(role: &str) -> Result<Role, LlmError> {
    match role {
        "assistant" | "model" => Ok(Role::Model),
        "user" => Ok(Role::User),
        "system" | "developer" => Ok(Role::System),
        "function" | "tool" => Ok(Role::Function),
        other => Err(LlmError::invalid_argument(format!(
            "unrecognized role `{other}`"
        ))),
    }
}

/// OpenAI-style `tools` and `tool_choice` keys for the configured functions.
///
/// Returns an empty map when no functions are declared.
pub fn prepare_function_calling_params(config: &GenerationConfig) -> Params {
    let mut params = Params::new();
    if config.function_declarations.is_empty() {
        return params;
    }

    let tools: Vec<Value> = config
        .function_declarations
        .iter()
        .map(|decl| {
            let mut function = json!({ "name": decl.name });
            if let Some(description) = &decl.description {
                function["description"] = json!(description);
            }
            if let Some(parameters) = &decl.parameters {
                function["parameters"] = parameters.clone();
            }
            json!({ "type": "function", "function": function })
        })
        .collect();
    params.insert("tools".to_string(), Value::Array(tools));

    if let Some(calling) = &config.function_calling {
        let choice = match (calling.mode, calling.allowed_function_names.as_slice()) {
            (FunctionCallingMode::Any, [name]) => {
                json!({ "type": "function", "function": { "name": name } })
            }
            (FunctionCallingMode::Any, _) => json!("required"),
            (FunctionCallingMode::None, _) => json!("none"),
            (FunctionCallingMode::Auto, _) => json!("auto"),
        };
        params.insert("tool_choice".to_string(), choice);
    }
    params
}

/// Canonical text and media parts to an OpenAI chat content array.
///
/// Images are sent as `image_url` (data URL or remote URL). WAV/MP3 inline
/// audio is sent as `input_audio` when `allow_audio` is set. Any other media
/// fails `UnsupportedPart`. Function parts are not content and are skipped.
pub fn prepare_multimodal_parts(parts: &Parts, allow_audio: bool) -> Result<Vec<Value>, LlmError> {
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            Part::Text(text) => out.push(json!({ "type": "text", "text": text })),
            Part::InlineData(data) if data.mime_type.starts_with("image/") => out.push(json!({
                "type": "image_url",
                "image_url": { "url": data.to_data_url() },
            })),
            Part::InlineData(data) if allow_audio && data.mime_type.starts_with("audio/") => {
                let format = match data.mime_type.as_str() {
                    "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
                    "audio/mpeg" | "audio/mp3" => "mp3",
                    other => {
                        return Err(LlmError::unsupported_part(format!(
                            "audio input must be WAV or MP3, got {other}"
                        )));
                    }
                };
                out.push(json!({
                    "type": "input_audio",
                    "input_audio": { "data": data.base64_payload(), "format": format },
                }));
            }
            Part::FileData(file) if file.mime_type.starts_with("image/") => out.push(json!({
                "type": "image_url",
                "image_url": { "url": file.file_uri },
            })),
            Part::InlineData(data) => {
                return Err(LlmError::unsupported_part(format!(
                    "inline {} data is not supported, only images{}",
                    media::mime_family(&data.mime_type),
                    if allow_audio { " and audio" } else { "" }
                )));
            }
            Part::FileData(file) => {
                return Err(LlmError::unsupported_part(format!(
                    "file data of type {} is not supported, only images",
                    file.mime_type
                )));
            }
            Part::FunctionCall(_) | Part::FunctionResponse(_) => {}
        }
    }
    Ok(out)
}

/// Delta candidate for one streamed chunk.
///
/// Part 0 is always the chunk's text fragment. The non-text parts emitted by
/// `previous` are repeated in place so they line up positionally with the
/// accumulated result (where the aggregator leaves them untouched), and
/// `new_parts` follow at fresh indices.
pub(crate) fn carry_forward_delta(
    previous: Option<&Candidate>,
    role: Role,
    text: String,
    new_parts: Vec<Part>,
) -> Candidate {
    let mut parts = Parts::new();
    parts.push(Part::Text(text));
    if let Some(previous) = previous {
        for part in previous.content.parts.iter().skip(1) {
            if part.kind() != PartKind::Text {
                parts.push(part.clone());
            }
        }
    }
    for part in new_parts {
        parts.push(part);
    }
    let mut candidate = Candidate::new(Content::new(role, parts));
    if let Some(previous) = previous {
        candidate.stream_state = previous.stream_state.clone();
    }
    candidate
}

/// Starting point of a multi-candidate delta: every previously streamed
/// candidate with an empty text fragment and its non-text parts in place.
pub(crate) fn delta_base(previous: Option<&Candidates>) -> Vec<Candidate> {
    previous
        .map(|prev| {
            prev.iter()
                .map(|c| carry_forward_delta(Some(c), c.content.role, String::new(), Vec::new()))
                .collect()
        })
        .unwrap_or_default()
}

/// Slot for a vendor-reported candidate index.
///
/// A chunk may update any candidate streamed so far or open the next one;
/// anything further would leave a gap in the sequence.
pub(crate) fn candidate_slot(index: u64, streamed: usize) -> Result<usize, LlmError> {
    usize::try_from(index)
        .ok()
        .filter(|&slot| slot <= streamed)
        .ok_or_else(|| gap_error(index, streamed))
}

/// Put `candidate` at `index`, at most one past the end of `base`.
pub(crate) fn place_candidate(
    base: &mut Vec<Candidate>,
    index: usize,
    candidate: Candidate,
) -> Result<(), LlmError> {
    match index.cmp(&base.len()) {
        std::cmp::Ordering::Less => base[index] = candidate,
        std::cmp::Ordering::Equal => base.push(candidate),
        std::cmp::Ordering::Greater => return Err(gap_error(index as u64, base.len())),
    }
    Ok(())
}

fn gap_error(index: u64, streamed: usize) -> LlmError {
    LlmError::UnexpectedChunk(format!(
        "candidate index {index} skips past the {streamed} candidates streamed so far"
    ))
}
