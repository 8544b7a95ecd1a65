//! Test fixtures utilities: load SSE fixtures and deframe them into chunk payloads
//!
//! Plays the transport collaborator: the crate itself only ever sees the
//! `data:` payload of each event.

#![allow(dead_code)]

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use genai_bridge::LlmError;
use std::io;

/// Load an `.sse` fixture file and split it into SSE events (separated by blank lines), returning a byte stream
pub fn load_sse_fixture_as_bytes(path: &str) -> io::Result<Vec<Result<Vec<u8>, io::Error>>> {
    let raw = std::fs::read_to_string(path)?;
    // Normalize line endings
    let normalized = raw.replace("\r\n", "\n");
    let mut out = Vec::new();
    for chunk in normalized.split("\n\n") {
        let s = chunk.trim_end_matches('\n');
        if s.is_empty() {
            continue;
        }
        // Restore SSE event blank line terminator
        let mut owned = String::from(s);
        owned.push_str("\n\n");
        out.push(Ok(owned.into_bytes()));
    }
    Ok(out)
}

/// Deframe a byte stream into SSE `data` payloads
pub fn payload_stream(
    bytes: Vec<Result<Vec<u8>, io::Error>>,
) -> impl Stream<Item = Result<String, LlmError>> + Send {
    futures_util::stream::iter(bytes)
        .eventsource()
        .map(|event| {
            event
                .map(|e| e.data)
                .map_err(|e| LlmError::invalid_argument(format!("sse framing: {e}")))
        })
}

/// Load a fixture and collect its payloads synchronously
pub fn load_payloads(path: &str) -> Vec<Result<String, LlmError>> {
    let bytes = load_sse_fixture_as_bytes(path).expect("load fixture");
    futures::executor::block_on(payload_stream(bytes).collect())
}
