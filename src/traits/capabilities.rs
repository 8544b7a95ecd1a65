//! Capability classification
//!
//! Adapters declare a static set of [`ModelOperation`] markers; calling layers
//! gate the operations they offer on the resulting [`CapabilityTag`] set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::LlmError;
use crate::types::{Content, PartKind};

/// Operation an adapter declares it implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelOperation {
    TextGeneration,
    StreamingTextGeneration,
    ImageGeneration,
    TextToSpeech,
    FunctionCalling,
    MultimodalInput,
    ChatHistory,
}

/// Capability exposed to calling layers (closed set, snake_case on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTag {
    TextGeneration,
    ImageGeneration,
    TextToSpeech,
    FunctionCalling,
    MultimodalInput,
    ChatHistory,
}

pub type CapabilitySet = BTreeSet<CapabilityTag>;

impl CapabilityTag {
    pub const ALL: [CapabilityTag; 6] = [
        Self::TextGeneration,
        Self::ImageGeneration,
        Self::TextToSpeech,
        Self::FunctionCalling,
        Self::MultimodalInput,
        Self::ChatHistory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextGeneration => "text_generation",
            Self::ImageGeneration => "image_generation",
            Self::TextToSpeech => "text_to_speech",
            Self::FunctionCalling => "function_calling",
            Self::MultimodalInput => "multimodal_input",
            Self::ChatHistory => "chat_history",
        }
    }
}

impl FromStr for CapabilityTag {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| LlmError::invalid_argument(format!("unknown capability `{s}`")))
    }
}

impl std::fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ModelOperation {
    pub fn capability(&self) -> CapabilityTag {
        match self {
            Self::TextGeneration | Self::StreamingTextGeneration => CapabilityTag::TextGeneration,
            Self::ImageGeneration => CapabilityTag::ImageGeneration,
            Self::TextToSpeech => CapabilityTag::TextToSpeech,
            Self::FunctionCalling => CapabilityTag::FunctionCalling,
            Self::MultimodalInput => CapabilityTag::MultimodalInput,
            Self::ChatHistory => CapabilityTag::ChatHistory,
        }
    }
}

/// Map declared operation markers to capability tags. Never fails.
pub fn classify(operations: &[ModelOperation]) -> CapabilitySet {
    operations.iter().map(ModelOperation::capability).collect()
}

/// Reject input shapes the capability set cannot serve.
///
/// - empty input
/// - more than one non-system content without `chat_history`
/// - media parts without `multimodal_input`
/// - function call/response parts without `function_calling`
pub fn validate_input(capabilities: &CapabilitySet, contents: &[Content]) -> Result<(), LlmError> {
    if contents.is_empty() {
        return Err(LlmError::invalid_argument("at least one content is required"));
    }

    let turns = contents
        .iter()
        .filter(|c| c.role != crate::types::Role::System)
        .count();
    if turns > 1 && !capabilities.contains(&CapabilityTag::ChatHistory) {
        return Err(LlmError::invalid_argument(
            "model does not support chat history; pass a single content",
        ));
    }

    for part in contents.iter().flat_map(|c| c.parts.iter()) {
        match part.kind() {
            PartKind::InlineData | PartKind::FileData
                if !capabilities.contains(&CapabilityTag::MultimodalInput) =>
            {
                return Err(LlmError::invalid_argument(format!(
                    "model does not support multimodal input ({})",
                    part.kind()
                )));
            }
            PartKind::FunctionCall | PartKind::FunctionResponse
                if !capabilities.contains(&CapabilityTag::FunctionCalling) =>
            {
                return Err(LlmError::invalid_argument(format!(
                    "model does not support function calling ({})",
                    part.kind()
                )));
            }
            _ => {}
        }
    }
    Ok(())
}
