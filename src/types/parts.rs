use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::part::{Part, PartKind};
use crate::error::LlmError;

/// Ordered, 0-indexed sequence of [`Part`]s
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parts(Vec<Part>);

/// Selects parts by variant and, for media parts, by MIME-type prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartFilter {
    pub kind: Option<PartKind>,
    pub mime_prefix: Option<String>,
}

impl PartFilter {
    /// Match every part of the given variant.
    pub fn kind(kind: PartKind) -> Self {
        Self {
            kind: Some(kind),
            mime_prefix: None,
        }
    }

    /// Only match media parts whose MIME type starts with `prefix` (e.g. `image/`).
    pub fn with_mime_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.mime_prefix = Some(prefix.into());
        self
    }

    pub fn matches(&self, part: &Part) -> bool {
        if let Some(kind) = self.kind
            && part.kind() != kind
        {
            return false;
        }
        match &self.mime_prefix {
            Some(prefix) => part.mime_type().is_some_and(|m| m.starts_with(prefix.as_str())),
            None => true,
        }
    }
}

impl Parts {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, part: Part) {
        self.0.push(part);
    }

    pub fn get(&self, index: usize) -> Result<&Part, LlmError> {
        self.0.get(index).ok_or(LlmError::IndexOutOfBounds {
            index,
            len: self.0.len(),
        })
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Part> {
        self.0.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Part> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Part] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Part> {
        self.0
    }

    /// New collection holding only the parts that match `filter`, in order.
    pub fn filter(&self, filter: &PartFilter) -> Parts {
        self.0.iter().filter(|p| filter.matches(p)).cloned().collect()
    }

    /// Concatenation of all text parts.
    pub fn text(&self) -> String {
        self.0.iter().filter_map(Part::as_text).collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(Part::to_value).collect())
    }

    pub fn from_value(value: &Value) -> Result<Self, LlmError> {
        value
            .as_array()
            .ok_or_else(|| LlmError::invalid_argument("parts must be a JSON array"))?
            .iter()
            .map(Part::from_value)
            .collect()
    }
}

impl From<Vec<Part>> for Parts {
    fn from(parts: Vec<Part>) -> Self {
        Self(parts)
    }
}

impl FromIterator<Part> for Parts {
    fn from_iter<T: IntoIterator<Item = Part>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Parts {
    type Item = Part;
    type IntoIter = std::vec::IntoIter<Part>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Parts {
    type Item = &'a Part;
    type IntoIter = std::slice::Iter<'a, Part>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Parts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Parts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Part>::deserialize(deserializer).map(Self)
    }
}
