//! Anthropic Messages API adapter
//!
//! - `request` builds the `/v1/messages` body
//! - `response` parses full message responses
//! - `streaming` implements the SSE chunk state machine

mod request;
mod response;
mod streaming;

pub use streaming::AnthropicChunk;

use serde_json::{Value, json};

use crate::error::LlmError;
use crate::params::ParameterConstraints;
use crate::providers::shared::{ensure_complete, explicit_params, system_instruction};
use crate::traits::{ModelOperation, Params, ProviderAdapter};
use crate::types::{Candidates, Content, GenerationConfig};

const DEFAULT_OPERATIONS: &[ModelOperation] = &[
    ModelOperation::TextGeneration,
    ModelOperation::StreamingTextGeneration,
    ModelOperation::FunctionCalling,
    ModelOperation::MultimodalInput,
    ModelOperation::ChatHistory,
];

/// Adapter for Claude models
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    model: String,
    constraints: ParameterConstraints,
    operations: Vec<ModelOperation>,
}

impl AnthropicAdapter {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            constraints: ParameterConstraints::anthropic(),
            operations: DEFAULT_OPERATIONS.to_vec(),
        }
    }

    /// `max_tokens` sent when the config leaves `maxOutputTokens` unset
    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.constraints = self.constraints.with_default_max_tokens(max_tokens);
        self
    }

    pub fn with_operations(mut self, operations: impl Into<Vec<ModelOperation>>) -> Self {
        self.operations = operations.into();
        self
    }

    pub fn constraints(&self) -> &ParameterConstraints {
        &self.constraints
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn provider_id(&self) -> &str {
        "anthropic"
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
            Value::Array(request::build_messages(contents)?),
        );
        if let Some(system) = system_instruction(contents)? {
            params.entry("system").or_insert_with(|| json!(system));
        }

        let params = request::transformers(&self.constraints).apply(params, config);
        tracing::debug!(
            model = %self.model,
            keys = params.len(),
            "built anthropic request params"
        );
        Ok(params)
    }

    fn parse_response(&self, raw: &Value) -> Result<Candidates, LlmError> {
        Ok(Candidates::from(vec![response::parse_message(raw)?]))
    }

    fn parse_chunk(
        &self,
        raw: &Value,
        previous: Option<&Candidates>,
    ) -> Result<Candidates, LlmError> {
        streaming::parse_chunk(raw, previous)
    }
}
