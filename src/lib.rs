//! genai-bridge
//!
//! Vendor-agnostic content model, per-provider request/response adapters and
//! the streaming aggregation engine that folds partial chunk payloads into one
//! coherent result.
//!
//! The HTTP transport, authentication and SSE deframing are owned by the
//! caller. This crate consumes and produces JSON payloads only:
//!
//! ```rust,ignore
//! use genai_bridge::prelude::*;
//!
//! let adapter = AnthropicAdapter::new("claude-3-5-sonnet-latest");
//! let params = adapter.build_params(&[Content::user_text("hi")], &GenerationConfig::default())?;
//! // ... the transport posts `params` and yields deframed chunk payloads ...
//! let mut stream = stream_candidates(&adapter, payloads);
//! let merged = stream.read_all_with(|delta| print!("{}", delta.first_text()))?;
//! ```
#![deny(unsafe_code)]

pub mod error;
pub mod params;
pub mod providers;
pub mod registry;
pub mod streaming;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::LlmError;

/// Commonly used types and traits.
pub mod prelude {
    pub use crate::error::LlmError;
    pub use crate::providers::anthropic::AnthropicAdapter;
    pub use crate::providers::gemini::GeminiAdapter;
    pub use crate::providers::openai_compatible::{OpenAiCompatibleAdapter, OpenAiCompatibleProfile};
    pub use crate::providers::openai_images::OpenAiImageAdapter;
    pub use crate::registry::AdapterRegistry;
    pub use crate::streaming::{
        AsyncCandidatesStream, CandidatesAccumulator, CandidatesStream, parse_chunk_stream,
        stream_candidates, stream_candidates_async,
    };
    pub use crate::traits::{CapabilityTag, ModelOperation, ProviderAdapter, classify};
    pub use crate::types::{
        Candidate, Candidates, Content, FunctionCallingConfig, FunctionCallingMode,
        FunctionDeclaration, GenerationConfig, Part, PartFilter, PartKind, Parts, Role,
    };
}
