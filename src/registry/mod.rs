//! Adapter registry
//!
//! An explicitly constructed lookup table from provider ids to adapters.
//! Callers build one, register the adapters they want, and pass it to
//! whatever layer needs it; there is no process-wide instance.
//!
//! ```rust,ignore
//! let mut registry = AdapterRegistry::new();
//! registry.register(AnthropicAdapter::new("claude-3-5-sonnet-latest"));
//! registry.register(GeminiAdapter::new("gemini-1.5-flash"));
//!
//! let adapter = registry.resolve("anthropic:claude-3-5-sonnet-latest")?;
//! let vision = registry.providers_supporting(CapabilityTag::MultimodalInput);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::LlmError;
use crate::traits::{CapabilitySet, CapabilityTag, ProviderAdapter};

/// Registered adapter plus the ids it answers to
#[derive(Debug, Clone)]
pub struct AdapterRecord {
    pub id: String,
    pub adapter: Arc<dyn ProviderAdapter>,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    separator: char,
    by_id: BTreeMap<String, AdapterRecord>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self {
            separator: ':',
            by_id: BTreeMap::new(),
        }
    }
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Separator used by [`resolve`](Self::resolve) ids, `:` by default.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Register an adapter under its provider id, replacing any previous one.
    pub fn register(&mut self, adapter: impl ProviderAdapter + 'static) -> &mut Self {
        let id = adapter.provider_id().to_string();
        self.register_as(id, Arc::new(adapter))
    }

    /// Register a shared adapter under an explicit id.
    pub fn register_as(
        &mut self,
        id: impl Into<String>,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> &mut Self {
        let id = id.into();
        tracing::debug!(
            id = %id,
            provider = adapter.provider_id(),
            model = adapter.model(),
            "registering adapter"
        );
        let record = AdapterRecord {
            id: id.clone(),
            adapter,
            aliases: Vec::new(),
        };
        self.by_id.insert(id, record);
        self
    }

    /// Add an alternative id for an already registered adapter.
    pub fn alias(&mut self, id: &str, alias: impl Into<String>) -> Result<&mut Self, LlmError> {
        let record = self
            .by_id
            .get_mut(id)
            .ok_or_else(|| LlmError::invalid_argument(format!("no adapter registered as `{id}`")))?;
        record.aliases.push(alias.into());
        Ok(self)
    }

    /// Look up by id or alias.
    pub fn get(&self, id_or_alias: &str) -> Option<&Arc<dyn ProviderAdapter>> {
        self.record(id_or_alias).map(|record| &record.adapter)
    }

    fn record(&self, id_or_alias: &str) -> Option<&AdapterRecord> {
        if let Some(record) = self.by_id.get(id_or_alias) {
            return Some(record);
        }
        self.by_id
            .values()
            .find(|record| record.aliases.iter().any(|a| a == id_or_alias))
    }

    /// Split a `provider:model` id into its two halves.
    pub fn split_id<'s>(&self, id: &'s str) -> Result<(&'s str, &'s str), LlmError> {
        match id.split_once(self.separator) {
            Some((provider, model)) if !provider.is_empty() && !model.is_empty() => {
                Ok((provider, model))
            }
            _ => Err(LlmError::invalid_argument(format!(
                "invalid model id `{id}` (expected provider{}model)",
                self.separator
            ))),
        }
    }

    /// Resolve a `provider:model` id to the adapter registered for exactly
    /// that model.
    pub fn resolve(&self, id: &str) -> Result<&Arc<dyn ProviderAdapter>, LlmError> {
        let (provider, model) = self.split_id(id)?;
        let adapter = self
            .get(provider)
            .ok_or_else(|| LlmError::invalid_argument(format!("unknown provider `{provider}`")))?;
        if adapter.model() != model {
            return Err(LlmError::invalid_argument(format!(
                "provider `{provider}` is registered for model `{}`, not `{model}`",
                adapter.model()
            )));
        }
        Ok(adapter)
    }

    pub fn capabilities(&self, id_or_alias: &str) -> Option<CapabilitySet> {
        self.get(id_or_alias).map(|adapter| adapter.capabilities())
    }

    /// Registered ids whose adapter carries `tag`, in id order.
    pub fn providers_supporting(&self, tag: CapabilityTag) -> Vec<&str> {
        self.by_id
            .values()
            .filter(|record| record.adapter.capabilities().contains(&tag))
            .map(|record| record.id.as_str())
            .collect()
    }

    /// Registered ids in order
    pub fn list(&self) -> Vec<&str> {
        self.by_id.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
