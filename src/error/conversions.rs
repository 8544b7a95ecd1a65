//! Type Conversions for LlmError
//!
//! From implementations for the error types of the crates we build on.

use super::types::LlmError;

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for LlmError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<base64::DecodeError> for LlmError {
    fn from(err: base64::DecodeError) -> Self {
        Self::InvalidArgument(format!("invalid base64 data: {err}"))
    }
}
