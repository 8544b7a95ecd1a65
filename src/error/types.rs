//! Core error types

use thiserror::Error;

/// Errors raised while building requests, parsing vendor payloads or
/// aggregating streamed chunks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    /// A content role outside of `user | model | system | function`.
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// A required field is absent in constructed data.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A required key is absent in a vendor response or chunk.
    /// Carries the dotted path, e.g. `delta.text`.
    #[error("Missing response key: {0}")]
    MissingResponseKey(String),

    /// A content part discriminator that matches no known variant, or a
    /// vendor payload value of the wrong JSON type.
    #[error("Unexpected content part: {0}")]
    UnexpectedContentPart(String),

    /// A streaming chunk whose type discriminator is not recognized.
    #[error("Unexpected chunk: {0}")]
    UnexpectedChunk(String),

    /// A valid part the target vendor cannot accept.
    #[error("Unsupported part: {0}")]
    UnsupportedPart(String),

    /// Indexed access beyond the collection size.
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Malformed input handed to a constructor, `from_map` or `build_params`.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The adapter does not implement the requested operation.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A raw payload that is not valid JSON.
    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Coarse grouping used by calling layers to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller-supplied data was invalid.
    Input,
    /// A vendor response did not have the expected shape.
    Response,
    /// A streaming chunk could not be interpreted.
    Stream,
    /// The vendor or adapter cannot do what was asked.
    Unsupported,
}

impl LlmError {
    /// Missing key at a dotted path inside a vendor payload.
    pub fn missing_key(path: impl Into<String>) -> Self {
        Self::MissingResponseKey(path.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported_part(message: impl Into<String>) -> Self {
        Self::UnsupportedPart(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRole(_)
            | Self::MissingField(_)
            | Self::IndexOutOfBounds { .. }
            | Self::InvalidArgument(_) => ErrorCategory::Input,
            Self::MissingResponseKey(_) | Self::UnexpectedContentPart(_) | Self::JsonError(_) => {
                ErrorCategory::Response
            }
            Self::UnexpectedChunk(_) => ErrorCategory::Stream,
            Self::UnsupportedPart(_) | Self::UnsupportedOperation(_) => ErrorCategory::Unsupported,
        }
    }

    /// Whether the error stems from a vendor payload that could not be parsed.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MissingResponseKey(_)
                | Self::UnexpectedContentPart(_)
                | Self::UnexpectedChunk(_)
                | Self::JsonError(_)
        )
    }
}
