//! Google Gemini `generateContent` adapter
//!
//! The canonical content model is Gemini's own wire shape, so contents map
//! nearly 1:1. Streaming uses `streamGenerateContent?alt=sse`, where every
//! chunk is a complete response object carrying that chunk's text.

mod request;
mod response;

use serde_json::Value;

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

#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    model: String,
    constraints: ParameterConstraints,
    operations: Vec<ModelOperation>,
}

impl GeminiAdapter {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            constraints: ParameterConstraints::default(),
            operations: DEFAULT_OPERATIONS.to_vec(),
        }
    }

    pub fn with_operations(mut self, operations: impl Into<Vec<ModelOperation>>) -> Self {
        self.operations = operations.into();
        self
    }

    pub fn with_constraints(mut self, constraints: ParameterConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Request path relative to the API base, streaming or not.
    pub fn endpoint_path(&self, stream: bool) -> String {
        if stream {
            format!("models/{}:streamGenerateContent?alt=sse", self.model)
        } else {
            format!("models/{}:generateContent", self.model)
        }
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn provider_id(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn operations(&self) -> &[ModelOperation] {
        &self.operations
    }

    /// The model is part of the request URL, so it is not sent in the body.
    fn build_params(
        &self,
        contents: &[Content],
        config: &GenerationConfig,
    ) -> Result<Params, LlmError> {
        config.check()?;
        ensure_complete(contents)?;

        let mut params = explicit_params(config);
        params.insert(
            "contents".to_string(),
            Value::Array(request::build_contents(contents)?),
        );
        if let Some(system) = system_instruction(contents)? {
            params
                .entry("systemInstruction")
                .or_insert_with(|| request::system_instruction(&system));
        }
        request::merge_generation_config(&mut params, &self.constraints, config);
        let params = request::tool_params().apply(params, config);

        tracing::debug!(
            model = %self.model,
            contents = contents.len(),
            "built gemini request params"
        );
        Ok(params)
    }

    /// Streaming is selected by the endpoint; the body is unchanged.
    fn prepare_stream_params(&self, _params: &mut Params) {}

    fn parse_response(&self, raw: &Value) -> Result<Candidates, LlmError> {
        response::parse_response(raw)
    }

    fn parse_chunk(
        &self,
        raw: &Value,
        previous: Option<&Candidates>,
    ) -> Result<Candidates, LlmError> {
        response::parse_chunk(raw, previous)
    }
}
