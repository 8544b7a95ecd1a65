//! Inline media helpers
//!
//! Inline data travels either as bare base64 or as a `data:` URL. Vendors
//! disagree on which form they accept, so adapters normalize through here.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::LlmError;

/// Split a `data:<mime>;base64,<payload>` URL into `(mime, payload)`.
pub fn parse_data_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    Some((mime, payload))
}

/// Return the base64 payload, stripping a data-URL prefix when present.
pub fn base64_payload(data: &str) -> &str {
    parse_data_url(data).map(|(_, payload)| payload).unwrap_or(data)
}

/// Build a `data:` URL from a MIME type and base64 (or data-URL) data.
pub fn to_data_url(mime_type: &str, data: &str) -> String {
    if data.starts_with("data:") {
        return data.to_string();
    }
    format!("data:{mime_type};base64,{data}")
}

/// Decode base64 (or data-URL) data into bytes.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, LlmError> {
    Ok(STANDARD.decode(base64_payload(data))?)
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// MIME family, e.g. `image` for `image/png`.
pub fn mime_family(mime_type: &str) -> &str {
    mime_type.split('/').next().unwrap_or(mime_type)
}
