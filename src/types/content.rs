use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Value, json};
use std::str::FromStr;

use super::part::Part;
use super::parts::Parts;
use crate::error::LlmError;

/// Author of a [`Content`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
    Function,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
            Self::System => "system",
            Self::Function => "function",
        }
    }
}

impl FromStr for Role {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "model" => Ok(Self::Model),
            "system" => Ok(Self::System),
            "function" => Ok(Self::Function),
            other => Err(LlmError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message: a role plus an ordered sequence of parts
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub role: Role,
    pub parts: Parts,
}

impl Content {
    pub fn new(role: Role, parts: impl Into<Parts>) -> Self {
        Self {
            role,
            parts: parts.into(),
        }
    }

    /// Construct from a role name, failing `InvalidRole` outside the closed set.
    pub fn try_new(role: &str, parts: impl Into<Parts>) -> Result<Self, LlmError> {
        Ok(Self::new(role.parse()?, parts))
    }

    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role, vec![Part::text(text)])
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::text(Role::User, text)
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self::text(Role::Model, text)
    }

    pub fn system_text(text: impl Into<String>) -> Self {
        Self::text(Role::System, text)
    }

    /// In-flight streaming delta: a single empty text part.
    pub(crate) fn streaming_placeholder(role: Role) -> Self {
        Self::text(role, "")
    }

    /// Concatenated text of all text parts.
    pub fn text_content(&self) -> String {
        self.parts.text()
    }

    pub fn to_value(&self) -> Value {
        json!({
            "role": self.role.as_str(),
            "parts": self.parts.to_value(),
        })
    }

    /// Parse a canonical content object; `role` and `parts` are both required.
    pub fn from_value(value: &Value) -> Result<Self, LlmError> {
        Self::from_value_with_default_role(value, None)
    }

    /// Parse a content object, using `default_role` when `role` is omitted.
    ///
    /// A present but unrecognized role is always rejected.
    pub(crate) fn from_value_with_default_role(
        value: &Value,
        default_role: Option<Role>,
    ) -> Result<Self, LlmError> {
        let obj = value
            .as_object()
            .ok_or_else(|| LlmError::invalid_argument("content must be a JSON object"))?;

        let role = match obj.get("role") {
            Some(Value::String(role)) => Role::from_str(role)
                .map_err(|_| LlmError::invalid_argument(format!("unrecognized role `{role}`")))?,
            Some(other) => {
                return Err(LlmError::invalid_argument(format!(
                    "role must be a string, got {other}"
                )));
            }
            None => default_role
                .ok_or_else(|| LlmError::invalid_argument("content is missing `role`"))?,
        };

        let parts = obj
            .get("parts")
            .ok_or_else(|| LlmError::invalid_argument("content is missing `parts`"))?;

        Ok(Self::new(role, Parts::from_value(parts)?))
    }
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
