//! OpenAI-compatible chat completions adapter
//!
//! One adapter serves every vendor speaking the chat-completions dialect; the
//! per-vendor differences live in [`OpenAiCompatibleProfile`].
//!
//! - `profiles` - built-in vendor profiles
//! - `request` - messages and derived keys
//! - `response` - full completion parsing
//! - `streaming` - chunk parsing with tool-call buffering

mod profiles;
mod request;
mod response;
mod streaming;

pub use profiles::OpenAiCompatibleProfile;

use serde_json::{Value, json};

use crate::error::LlmError;
use crate::providers::shared::{ensure_complete, explicit_params};
use crate::traits::{ModelOperation, Params, ProviderAdapter};
use crate::types::{Candidates, Content, GenerationConfig};

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleAdapter {
    model: String,
    profile: OpenAiCompatibleProfile,
    operations: Vec<ModelOperation>,
}

impl OpenAiCompatibleAdapter {
    pub fn new(profile: OpenAiCompatibleProfile, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            operations: profile.operations(),
            profile,
        }
    }

    /// Adapter for a built-in profile by provider id.
    pub fn for_provider(provider_id: &str, model: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self::new(OpenAiCompatibleProfile::by_id(provider_id)?, model))
    }

    pub fn openai(model: impl Into<String>) -> Self {
        Self::new(OpenAiCompatibleProfile::openai(), model)
    }

    pub fn with_operations(mut self, operations: impl Into<Vec<ModelOperation>>) -> Self {
        self.operations = operations.into();
        self
    }

    pub fn profile(&self) -> &OpenAiCompatibleProfile {
        &self.profile
    }
}

impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn provider_id(&self) -> &str {
        &self.profile.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn operations(&self) -> &[ModelOperation] {
        &self.operations
    }

    fn build_params(
        &self,
        contents: &[Content],
        config: &GenerationConfig,
    ) -> Result<Params, LlmError> {
        config.check()?;
        ensure_complete(contents)?;

        let mut params = explicit_params(config);
        params.insert("model".to_string(), json!(self.model));
        params.insert(
            "messages".to_string(),
            Value::Array(request::build_messages(contents, &self.profile)?),
        );
        let params = request::transformers(&self.profile).apply(params, config);

        tracing::debug!(
            provider = %self.profile.id,
            model = %self.model,
            "built chat completion params"
        );
        Ok(params)
    }

    fn prepare_stream_params(&self, params: &mut Params) {
        params.insert("stream".to_string(), Value::Bool(true));
        if self.profile.supports_stream_usage {
            params
                .entry("stream_options")
                .or_insert_with(|| json!({ "include_usage": true }));
        }
    }

    fn parse_response(&self, raw: &Value) -> Result<Candidates, LlmError> {
        response::parse_response(raw)
    }

    fn parse_chunk(
        &self,
        raw: &Value,
        previous: Option<&Candidates>,
    ) -> Result<Candidates, LlmError> {
        streaming::parse_chunk(raw, previous)
    }
}
