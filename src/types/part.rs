use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::error::LlmError;
use crate::utils::media;

/// Content part - one element of a message, fixed to its variant at creation
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Plain text
    Text(String),
    /// Base64 (or data-URL) encoded media
    InlineData(InlineData),
    /// Media referenced by URI
    FileData(FileData),
    /// Function call requested by the model
    FunctionCall(FunctionCall),
    /// Result of a function call, sent back to the model
    FunctionResponse(FunctionResponse),
}

/// Discriminator of a [`Part`], named after its canonical wire key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Text,
    InlineData,
    FileData,
    FunctionCall,
    FunctionResponse,
}

impl PartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::InlineData => "inlineData",
            Self::FileData => "fileData",
            Self::FunctionCall => "functionCall",
            Self::FunctionResponse => "functionResponse",
        }
    }
}

impl std::fmt::Display for PartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 payload or a full `data:` URL
    pub data: String,
}

impl InlineData {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Build from a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self, LlmError> {
        let (mime, _) = media::parse_data_url(url)
            .ok_or_else(|| LlmError::invalid_argument(format!("not a base64 data URL: {url}")))?;
        Ok(Self::new(mime, url))
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, media::encode_base64(bytes))
    }

    /// The bare base64 payload, without any data-URL prefix.
    pub fn base64_payload(&self) -> &str {
        media::base64_payload(&self.data)
    }

    pub fn to_data_url(&self) -> String {
        media::to_data_url(&self.mime_type, &self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>, LlmError> {
        media::decode_base64(&self.data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

impl FileData {
    pub fn new(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            file_uri: file_uri.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the function that produced this response. Only some vendors
    /// need it; adapters fill it from the matching call when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub response: Map<String, Value>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData(InlineData::new(mime_type, data))
    }

    pub fn file_data(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self::FileData(FileData::new(mime_type, file_uri))
    }

    pub fn function_call(
        id: impl Into<String>,
        name: impl Into<String>,
        args: Map<String, Value>,
    ) -> Self {
        Self::FunctionCall(FunctionCall {
            id: Some(id.into()),
            name: name.into(),
            args,
        })
    }

    pub fn function_response(id: impl Into<String>, response: Map<String, Value>) -> Self {
        Self::FunctionResponse(FunctionResponse {
            id: Some(id.into()),
            name: None,
            response,
        })
    }

    pub fn kind(&self) -> PartKind {
        match self {
            Self::Text(_) => PartKind::Text,
            Self::InlineData(_) => PartKind::InlineData,
            Self::FileData(_) => PartKind::FileData,
            Self::FunctionCall(_) => PartKind::FunctionCall,
            Self::FunctionResponse(_) => PartKind::FunctionResponse,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// MIME type of media parts.
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::InlineData(d) => Some(&d.mime_type),
            Self::FileData(d) => Some(&d.mime_type),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => json!({ "text": text }),
            Self::InlineData(d) => json!({ "inlineData": d }),
            Self::FileData(d) => json!({ "fileData": d }),
            Self::FunctionCall(c) => json!({ "functionCall": c }),
            Self::FunctionResponse(r) => json!({ "functionResponse": r }),
        }
    }

    /// Parse a canonical part object.
    ///
    /// Fails `UnexpectedContentPart` when no known discriminator key is
    /// present and `InvalidArgument` when a known variant is malformed.
    pub fn from_value(value: &Value) -> Result<Self, LlmError> {
        let obj = value
            .as_object()
            .ok_or_else(|| LlmError::invalid_argument("part must be a JSON object"))?;

        if let Some(text) = obj.get("text") {
            return text
                .as_str()
                .map(Self::text)
                .ok_or_else(|| LlmError::invalid_argument("text part must be a string"));
        }
        if let Some(inner) = obj.get("inlineData") {
            return Ok(Self::InlineData(nested(inner, "inlineData")?));
        }
        if let Some(inner) = obj.get("fileData") {
            return Ok(Self::FileData(nested(inner, "fileData")?));
        }
        if let Some(inner) = obj.get("functionCall") {
            return Ok(Self::FunctionCall(nested(inner, "functionCall")?));
        }
        if let Some(inner) = obj.get("functionResponse") {
            return Ok(Self::FunctionResponse(nested(inner, "functionResponse")?));
        }

        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        Err(LlmError::UnexpectedContentPart(format!(
            "unrecognized part keys [{}]",
            keys.join(", ")
        )))
    }
}

fn nested<T: serde::de::DeserializeOwned>(inner: &Value, key: &str) -> Result<T, LlmError> {
    serde_json::from_value(inner.clone())
        .map_err(|e| LlmError::invalid_argument(format!("invalid {key} part: {e}")))
}

impl Serialize for Part {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Part {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
