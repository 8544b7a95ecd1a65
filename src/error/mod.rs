//! Error Handling Module
//!
//! A single error type, [`LlmError`], is shared by the content model, the
//! provider adapters and the streaming aggregator. Errors are raised at the
//! point of detection and never swallowed; callers decide how to surface them.
//!
//! # Example
//!
//! ```rust,ignore
//! use genai_bridge::error::{ErrorCategory, LlmError};
//!
//! let error = LlmError::missing_key("delta.text");
//! assert_eq!(error.category(), ErrorCategory::Response);
//! assert!(error.is_parse_error());
//! ```

mod conversions;
pub mod types;

pub use types::*;
