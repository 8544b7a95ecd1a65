//! Provider adapter contract
//!
//! An adapter translates between the canonical content model and one vendor
//! wire format. It never performs I/O: the transport collaborator posts the
//! params it builds and hands back raw JSON (full responses or deframed chunk
//! payloads).

use serde_json::{Map, Value};

use super::capabilities::{CapabilitySet, ModelOperation, classify};
use crate::error::LlmError;
use crate::types::{Candidates, Content, GenerationConfig};

pub type Params = Map<String, Value>;

pub trait ProviderAdapter: Send + Sync + std::fmt::Debug {
    /// Provider identifier (e.g. "anthropic", "gemini", "openai")
    fn provider_id(&self) -> &str;

    /// Model the adapter builds requests for
    fn model(&self) -> &str;

    /// Operation markers this adapter implements
    fn operations(&self) -> &[ModelOperation];

    fn capabilities(&self) -> CapabilitySet {
        classify(self.operations())
    }

    /// Build the vendor request body. Deterministic; never mutates `contents`.
    fn build_params(
        &self,
        contents: &[Content],
        config: &GenerationConfig,
    ) -> Result<Params, LlmError>;

    /// Adjust already built params for a streaming request.
    fn prepare_stream_params(&self, params: &mut Params) {
        params.insert("stream".to_string(), Value::Bool(true));
    }

    fn build_stream_params(
        &self,
        contents: &[Content],
        config: &GenerationConfig,
    ) -> Result<Params, LlmError> {
        let mut params = self.build_params(contents, config)?;
        self.prepare_stream_params(&mut params);
        Ok(params)
    }

    /// Parse a full (non-streaming) response.
    fn parse_response(&self, raw: &Value) -> Result<Candidates, LlmError>;

    /// Parse one streaming chunk into its delta representation.
    ///
    /// `previous` is the delta produced for the preceding chunk, or `None`
    /// for the first chunk of a stream. The result is not merged with
    /// history; that is the aggregator's job.
    fn parse_chunk(
        &self,
        raw: &Value,
        previous: Option<&Candidates>,
    ) -> Result<Candidates, LlmError> {
        let _ = (raw, previous);
        Err(LlmError::UnsupportedOperation(format!(
            "{} does not support streaming",
            self.provider_id()
        )))
    }
}
