//! Named request parameter transformers
//!
//! A transformer derives one vendor key from the generation config. Keys that
//! are already present in the params are explicit and always win; derived
//! values that are falsy are never inserted.

use serde_json::Value;
use std::fmt;

use crate::traits::Params;
use crate::types::GenerationConfig;

pub type TransformerFn<C> = Box<dyn Fn(&C) -> Value + Send + Sync>;

/// Ordered set of named transformers
pub struct Transformers<C = GenerationConfig> {
    entries: Vec<(String, TransformerFn<C>)>,
}

impl<C> Transformers<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a transformer for `key`. A later registration for the same
    /// key replaces the earlier one.
    pub fn with<F>(mut self, key: impl Into<String>, transformer: F) -> Self
    where
        F: Fn(&C) -> Value + Send + Sync + 'static,
    {
        let key = key.into();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, Box::new(transformer)));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every transformer to `params`.
    ///
    /// Transformers for keys already in `params` are not even evaluated.
    pub fn apply(&self, mut params: Params, config: &C) -> Params {
        for (key, transformer) in &self.entries {
            if params.contains_key(key) {
                continue;
            }
            let value = transformer(config);
            if is_falsy(&value) {
                continue;
            }
            params.insert(key.clone(), value);
        }
        params
    }
}

impl<C> Default for Transformers<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Transformers<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// Free-function form of [`Transformers::apply`].
pub fn apply_transformers<C>(params: Params, config: &C, transformers: &Transformers<C>) -> Params {
    transformers.apply(params, config)
}

/// Empty or absent values: `null`, `false`, `""`, `[]` and `{}`.
///
/// Numbers are never falsy, so a numeric zero passes through. A transformer
/// that must suppress zero returns `null` for it explicitly.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}
