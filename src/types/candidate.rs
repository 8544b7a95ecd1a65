use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::content::{Content, Role};
use super::parts::PartFilter;
use crate::error::LlmError;

/// One alternative response generated by the model
///
/// Equality compares `content` and `additional_data` only.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub content: Content,
    /// Extra vendor fields (finish reason, usage, safety ratings, ...).
    /// Never contains a `content` key.
    pub additional_data: Map<String, Value>,
    /// Bookkeeping threaded from one streaming delta to the next
    pub(crate) stream_state: DeltaState,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content && self.additional_data == other.additional_data
    }
}

/// In-flight streaming state; never serialized and ignored by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DeltaState {
    /// Function calls whose arguments are still streaming in
    pub partial_calls: Vec<PartialFunctionCall>,
    /// Last characters of the text streamed so far in the open block
    pub text_tail: String,
}

/// Function call assembled from streamed argument fragments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PartialFunctionCall {
    pub index: u64,
    pub id: Option<String>,
    pub name: String,
    pub arguments: String,
}

impl Candidate {
    pub fn new(content: Content) -> Self {
        Self {
            content,
            additional_data: Map::new(),
            stream_state: DeltaState::default(),
        }
    }

    pub fn with_additional(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert_additional(key, value);
        self
    }

    /// Set an additional vendor field; the reserved `content` key is ignored.
    pub fn insert_additional(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if key != "content" {
            self.additional_data.insert(key, value);
        }
    }

    pub fn additional(&self, key: &str) -> Option<&Value> {
        self.additional_data.get(key)
    }

    pub fn to_value(&self) -> Value {
        let mut obj = self.additional_data.clone();
        obj.insert("content".to_string(), self.content.to_value());
        Value::Object(obj)
    }

    /// Build from raw candidate data.
    ///
    /// Fails `MissingField("content")` without a content key. A content
    /// without `role` is assistant-originated and defaults to `model`.
    pub fn from_value(value: &Value) -> Result<Self, LlmError> {
        let obj = value
            .as_object()
            .ok_or_else(|| LlmError::invalid_argument("candidate must be a JSON object"))?;
        let content = obj
            .get("content")
            .ok_or_else(|| LlmError::MissingField("content".to_string()))?;
        let content = Content::from_value_with_default_role(content, Some(Role::Model))?;

        let mut candidate = Self::new(content);
        for (key, value) in obj {
            candidate.insert_additional(key.clone(), value.clone());
        }
        Ok(candidate)
    }
}

impl Serialize for Candidate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Candidate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Ordered, 0-indexed collection of [`Candidate`]s
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates(Vec<Candidate>);

impl Candidates {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.0.push(candidate);
    }

    pub fn get(&self, index: usize) -> Result<&Candidate, LlmError> {
        self.0.get(index).ok_or(LlmError::IndexOutOfBounds {
            index,
            len: self.0.len(),
        })
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Candidate> {
        self.0.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.0.iter()
    }

    /// Keep only the parts matching `filter`; candidates left without any
    /// matching part are dropped rather than kept empty.
    pub fn filter(&self, filter: &PartFilter) -> Candidates {
        self.0
            .iter()
            .filter_map(|candidate| {
                let parts = candidate.content.parts.filter(filter);
                if parts.is_empty() {
                    return None;
                }
                Some(Candidate {
                    content: Content::new(candidate.content.role, parts),
                    additional_data: candidate.additional_data.clone(),
                    stream_state: DeltaState::default(),
                })
            })
            .collect()
    }

    pub fn contents(&self) -> Vec<&Content> {
        self.0.iter().map(|c| &c.content).collect()
    }

    /// Text of the first candidate, or an empty string.
    pub fn first_text(&self) -> String {
        self.0
            .first()
            .map(|c| c.content.text_content())
            .unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(Candidate::to_value).collect())
    }

    pub fn from_value(value: &Value) -> Result<Self, LlmError> {
        value
            .as_array()
            .ok_or_else(|| LlmError::invalid_argument("candidates must be a JSON array"))?
            .iter()
            .map(Candidate::from_value)
            .collect()
    }
}

impl From<Vec<Candidate>> for Candidates {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self(candidates)
    }
}

impl FromIterator<Candidate> for Candidates {
    fn from_iter<T: IntoIterator<Item = Candidate>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Candidates {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Candidates {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Candidates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Candidates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
