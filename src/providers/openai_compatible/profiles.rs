//! Provider profiles for OpenAI-compatible chat completion APIs
//!
//! A profile captures how one vendor deviates from the OpenAI dialect. The
//! adapter itself is shared; only the profile changes.

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::traits::ModelOperation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiCompatibleProfile {
    /// Provider identifier
    pub id: String,
    /// Base URL for the API
    pub base_url: String,
    /// Upper bound temperatures are clamped to
    pub max_temperature: f64,
    /// Request key carrying the output token limit
    pub max_tokens_key: String,
    pub supports_function_calling: bool,
    pub supports_image_input: bool,
    /// WAV/MP3 `input_audio` content parts
    pub supports_audio_input: bool,
    /// Whether `stream_options.include_usage` is understood
    pub supports_stream_usage: bool,
}

impl OpenAiCompatibleProfile {
    pub fn openai() -> Self {
        Self {
            id: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_temperature: 2.0,
            max_tokens_key: "max_completion_tokens".to_string(),
            supports_function_calling: true,
            supports_image_input: true,
            supports_audio_input: true,
            supports_stream_usage: true,
        }
    }

    pub fn xai() -> Self {
        Self {
            id: "xai".to_string(),
            base_url: "https://api.x.ai/v1".to_string(),
            max_tokens_key: "max_tokens".to_string(),
            supports_audio_input: false,
            ..Self::openai()
        }
    }

    pub fn mistral() -> Self {
        Self {
            id: "mistral".to_string(),
            base_url: "https://api.mistral.ai/v1".to_string(),
            max_temperature: 1.5,
            max_tokens_key: "max_tokens".to_string(),
            supports_audio_input: false,
            supports_stream_usage: false,
            ..Self::openai()
        }
    }

    pub fn deepseek() -> Self {
        Self {
            id: "deepseek".to_string(),
            base_url: "https://api.deepseek.com/v1".to_string(),
            max_tokens_key: "max_tokens".to_string(),
            supports_image_input: false,
            supports_audio_input: false,
            ..Self::openai()
        }
    }

    pub fn perplexity() -> Self {
        Self {
            id: "perplexity".to_string(),
            base_url: "https://api.perplexity.ai".to_string(),
            max_tokens_key: "max_tokens".to_string(),
            supports_function_calling: false,
            supports_image_input: false,
            supports_audio_input: false,
            supports_stream_usage: false,
            ..Self::openai()
        }
    }

    /// Every built-in profile
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::openai(),
            Self::xai(),
            Self::mistral(),
            Self::deepseek(),
            Self::perplexity(),
        ]
    }

    pub fn by_id(id: &str) -> Result<Self, LlmError> {
        Self::builtin()
            .into_iter()
            .find(|profile| profile.id == id)
            .ok_or_else(|| {
                LlmError::invalid_argument(format!("unknown OpenAI-compatible provider `{id}`"))
            })
    }

    /// Operation markers implied by the profile's feature flags
    pub fn operations(&self) -> Vec<ModelOperation> {
        let mut operations = vec![
            ModelOperation::TextGeneration,
            ModelOperation::StreamingTextGeneration,
            ModelOperation::ChatHistory,
        ];
        if self.supports_function_calling {
            operations.push(ModelOperation::FunctionCalling);
        }
        if self.supports_image_input || self.supports_audio_input {
            operations.push(ModelOperation::MultimodalInput);
        }
        operations
    }
}
