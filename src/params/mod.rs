//! Parameter Management Module
//!
//! Turns a vendor-agnostic [`GenerationConfig`](crate::types::GenerationConfig)
//! into vendor request keys.
//!
//! ## Module Organization
//!
//! - **`transformers`** - `Transformers` and `apply_transformers`, the single
//!   mechanism every adapter uses to derive keys from the config
//! - **`constraints`** - per-vendor numeric limits (temperature ceilings, token defaults)
//!
//! ### Example:
//!
//! ```rust,ignore
//! let transformers = Transformers::new()
//!     .with("temperature", |c: &GenerationConfig| json!(c.temperature))
//!     .with("max_tokens", |c: &GenerationConfig| json!(c.max_output_tokens.unwrap_or(4096)));
//! let params = transformers.apply(Params::new(), &config);
//! ```

pub mod constraints;
pub mod transformers;

pub use constraints::*;
pub use transformers::*;
