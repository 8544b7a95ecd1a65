//! JSON path read helpers for vendor payloads
//!
//! Paths use the dotted/array form `a.b[0].c`. Lookups that must succeed go
//! through the `require_*` family, which reports the full path on failure so
//! callers get `MissingResponseKey("delta.text")` rather than a generic error.
//! A present value of the wrong JSON type is a malformed vendor payload and
//! reports `UnexpectedContentPart`.

use serde_json::{Map, Value};

use crate::error::LlmError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PathSeg {
    Key(String),
    Index(usize),
}

/// Parse a dotted/array path like `a.b[0].c[2]` into segments
pub(crate) fn parse_path(path: &str) -> Vec<PathSeg> {
    let mut segs = Vec::new();
    for part in path.split('.') {
        if part.is_empty() {
            continue;
        }
        let mut key = String::new();
        let mut chars = part.chars().peekable();
        while let Some(&ch) = chars.peek() {
            if ch == '[' {
                break;
            }
            key.push(ch);
            chars.next();
        }
        if !key.is_empty() {
            segs.push(PathSeg::Key(key));
        }
        while let Some(&ch) = chars.peek() {
            if ch != '[' {
                break;
            }
            chars.next();
            let mut num = String::new();
            while let Some(&d) = chars.peek() {
                if d == ']' {
                    break;
                }
                num.push(d);
                chars.next();
            }
            let _ = chars.next();
            if let Ok(idx) = num.parse::<usize>() {
                segs.push(PathSeg::Index(idx));
            }
        }
    }
    segs
}

/// Get a value by path. JSON `null` counts as absent.
pub fn get_path<'a>(v: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cur = v;
    for seg in parse_path(path) {
        match (seg, cur) {
            (PathSeg::Key(k), Value::Object(map)) => {
                cur = map.get(&k)?;
            }
            (PathSeg::Index(i), Value::Array(arr)) => {
                cur = arr.get(i)?;
            }
            _ => return None,
        }
    }
    if cur.is_null() { None } else { Some(cur) }
}

/// Get a value by path or fail with `MissingResponseKey(path)`.
pub fn require<'a>(v: &'a Value, path: &str) -> Result<&'a Value, LlmError> {
    get_path(v, path).ok_or_else(|| LlmError::missing_key(path))
}

pub fn require_str<'a>(v: &'a Value, path: &str) -> Result<&'a str, LlmError> {
    require(v, path)?
        .as_str()
        .ok_or_else(|| wrong_type(path, "a string"))
}

pub fn require_object<'a>(v: &'a Value, path: &str) -> Result<&'a Map<String, Value>, LlmError> {
    require(v, path)?
        .as_object()
        .ok_or_else(|| wrong_type(path, "an object"))
}

pub fn require_array<'a>(v: &'a Value, path: &str) -> Result<&'a Vec<Value>, LlmError> {
    require(v, path)?
        .as_array()
        .ok_or_else(|| wrong_type(path, "an array"))
}

fn wrong_type(path: &str, expected: &str) -> LlmError {
    LlmError::UnexpectedContentPart(format!("expected {expected} at `{path}`"))
}

/// Optional string lookup; absent, `null` or non-string values yield `None`.
pub fn get_str<'a>(v: &'a Value, path: &str) -> Option<&'a str> {
    get_path(v, path).and_then(Value::as_str)
}
