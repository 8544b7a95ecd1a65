//! Provider adapters
//!
//! One adapter per vendor wire format. Behavior shared between vendors lives
//! in `shared` as plain functions each adapter calls explicitly.
//!
//! - **`anthropic`** - Anthropic Messages API
//! - **`gemini`** - Google Gemini `generateContent`
//! - **`openai_compatible`** - OpenAI chat completions and compatible vendors
//! - **`openai_images`** - OpenAI image generation

pub mod anthropic;
pub mod gemini;
pub mod openai_compatible;
pub mod openai_images;
pub mod shared;

pub use shared::{prepare_function_calling_params, prepare_multimodal_parts};
