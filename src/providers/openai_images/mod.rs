//! OpenAI image generation adapter (`/v1/images/generations`)
//!
//! The prompt is the text of the last content. Each generated image becomes
//! its own candidate. The endpoint does not stream.

use serde_json::{Value, json};

use crate::error::LlmError;
use crate::params::Transformers;
use crate::providers::shared::explicit_params;
use crate::traits::{ModelOperation, Params, ProviderAdapter};
use crate::types::{Candidate, Candidates, Content, GenerationConfig, Part, Role};
use crate::utils::{get_str, require_array};

const OPERATIONS: &[ModelOperation] = &[ModelOperation::ImageGeneration];

#[derive(Debug, Clone)]
pub struct OpenAiImageAdapter {
    model: String,
    size: Option<String>,
    quality: Option<String>,
}

impl OpenAiImageAdapter {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            size: None,
            quality: None,
        }
    }

    /// Image size, e.g. `1024x1024`
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }
}

impl ProviderAdapter for OpenAiImageAdapter {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn operations(&self) -> &[ModelOperation] {
        OPERATIONS
    }

    fn build_params(
        &self,
        contents: &[Content],
        config: &GenerationConfig,
    ) -> Result<Params, LlmError> {
        config.check()?;
        let last = contents
            .last()
            .ok_or_else(|| LlmError::invalid_argument("image generation needs a prompt"))?;
        if let Some(part) = last.parts.iter().find(|p| !matches!(p, Part::Text(_))) {
            return Err(LlmError::unsupported_part(format!(
                "image prompts only accept text, got {}",
                part.kind()
            )));
        }
        let prompt = last.text_content();
        if prompt.trim().is_empty() {
            return Err(LlmError::invalid_argument("image prompt is empty"));
        }

        let mut params = explicit_params(config);
        params.insert("model".to_string(), json!(self.model));
        params.insert("prompt".to_string(), json!(prompt));

        let size = self.size.clone();
        let quality = self.quality.clone();
        let transformers = Transformers::new()
            .with("n", |c: &GenerationConfig| json!(c.candidate_count))
            .with("size", move |_: &GenerationConfig| json!(size))
            .with("quality", move |_: &GenerationConfig| json!(quality))
            .with("response_format", |_: &GenerationConfig| json!("b64_json"));
        Ok(transformers.apply(params, config))
    }

    fn prepare_stream_params(&self, _params: &mut Params) {}

    fn parse_response(&self, raw: &Value) -> Result<Candidates, LlmError> {
        let data = require_array(raw, "data")?;
        data.iter()
            .enumerate()
            .map(|(i, image)| {
                let part = if let Some(b64) = get_str(image, "b64_json") {
                    Part::inline_data("image/png", b64)
                } else if let Some(url) = get_str(image, "url") {
                    Part::file_data("image/png", url)
                } else {
                    return Err(LlmError::missing_key(format!("data[{i}].b64_json")));
                };
                let mut candidate = Candidate::new(Content::new(Role::Model, vec![part]));
                if let Some(revised) = image.get("revised_prompt").filter(|v| !v.is_null()) {
                    candidate.insert_additional("revised_prompt", revised.clone());
                }
                if let Some(created) = raw.get("created") {
                    candidate.insert_additional("created", created.clone());
                }
                Ok(candidate)
            })
            .collect()
    }
}
