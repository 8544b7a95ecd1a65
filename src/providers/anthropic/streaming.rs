//! Anthropic streaming chunk state machine
//!
//! Each SSE payload carries a `type` discriminator. The adapter threads the
//! single in-flight candidate from the previous delta and emits a delta whose
//! text is this chunk's fragment only; concatenation is the aggregator's job.

use serde_json::{Map, Value};

use super::response::parse_streamed_message;
use crate::error::LlmError;
use crate::types::{Candidate, Candidates, Content};
use crate::utils::{require, require_object, require_str};

/// Chunk kinds of the Messages streaming protocol
#[derive(Debug, Clone, PartialEq)]
pub enum AnthropicChunk<'a> {
    MessageStart { message: &'a Value },
    ContentBlockStart { text: &'a str },
    ContentBlockDelta { text: &'a str },
    MessageDelta {
        delta: &'a Map<String, Value>,
        usage: Option<&'a Value>,
    },
    ContentBlockStop,
    MessageStop,
}

impl<'a> AnthropicChunk<'a> {
    /// Classify a raw chunk, failing with the precise missing key.
    pub fn parse(raw: &'a Value) -> Result<Self, LlmError> {
        let chunk_type = require_str(raw, "type")?;
        match chunk_type {
            "message_start" => Ok(Self::MessageStart {
                message: require(raw, "message")?,
            }),
            "content_block_start" => Ok(Self::ContentBlockStart {
                text: require_str(raw, "content_block.text")?,
            }),
            "content_block_delta" => Ok(Self::ContentBlockDelta {
                text: require_str(raw, "delta.text")?,
            }),
            "message_delta" => Ok(Self::MessageDelta {
                delta: require_object(raw, "delta")?,
                usage: raw.get("usage").filter(|u| !u.is_null()),
            }),
            "content_block_stop" => Ok(Self::ContentBlockStop),
            "message_stop" => Ok(Self::MessageStop),
            other => Err(LlmError::UnexpectedChunk(format!(
                "anthropic chunk type `{other}`"
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::MessageStart { .. } => "message_start",
            Self::ContentBlockStart { .. } => "content_block_start",
            Self::ContentBlockDelta { .. } => "content_block_delta",
            Self::MessageDelta { .. } => "message_delta",
            Self::ContentBlockStop => "content_block_stop",
            Self::MessageStop => "message_stop",
        }
    }
}

pub(super) fn parse_chunk(
    raw: &Value,
    previous: Option<&Candidates>,
) -> Result<Candidates, LlmError> {
    let chunk = AnthropicChunk::parse(raw)?;
    tracing::trace!(kind = chunk.kind(), "anthropic chunk");

    let Some(current) = previous.and_then(|p| p.iter().next()) else {
        return match chunk {
            AnthropicChunk::MessageStart { message } => {
                let mut candidate = parse_streamed_message(message)?;
                candidate.stream_state.text_tail = tail(&candidate.content.text_content());
                Ok(Candidates::from(vec![candidate]))
            }
            other => Err(LlmError::UnexpectedChunk(format!(
                "stream must begin with message_start, got {}",
                other.kind()
            ))),
        };
    };

    let candidate = match chunk {
        AnthropicChunk::MessageStart { .. } => {
            return Err(LlmError::UnexpectedChunk(
                "message_start after the stream has started".to_string(),
            ));
        }
        AnthropicChunk::ContentBlockStart { text } | AnthropicChunk::ContentBlockDelta { text } => {
            let mut candidate = with_text(current, text.to_string());
            candidate.stream_state.text_tail =
                tail(&format!("{}{text}", current.stream_state.text_tail));
            candidate
        }
        AnthropicChunk::MessageDelta { delta, usage } => {
            let mut candidate = with_text(current, String::new());
            for (key, value) in delta {
                candidate.insert_additional(key.clone(), value.clone());
            }
            if let Some(usage) = usage {
                candidate.insert_additional("usage", usage.clone());
            }
            candidate
        }
        AnthropicChunk::ContentBlockStop | AnthropicChunk::MessageStop => {
            let suffix = newline_suffix(&current.stream_state.text_tail);
            let mut candidate = with_text(current, suffix.to_string());
            candidate.stream_state.text_tail.clear();
            candidate
        }
    };
    Ok(Candidates::from(vec![candidate]))
}

/// Clone of the in-flight candidate whose parts are a single text fragment.
fn with_text(current: &Candidate, text: String) -> Candidate {
    let mut candidate = current.clone();
    candidate.content = Content::text(current.content.role, text);
    candidate
}

/// Last two characters of `text`, enough to decide the block terminator.
fn tail(text: &str) -> String {
    let start = text
        .char_indices()
        .rev()
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    text[start..].to_string()
}

/// Newlines that terminate a block: two, one if the streamed text already
/// ends in a single newline, none for an empty or already closed block.
fn newline_suffix(text: &str) -> &'static str {
    if text.is_empty() || text.ends_with("\n\n") {
        ""
    } else if text.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    }
}
