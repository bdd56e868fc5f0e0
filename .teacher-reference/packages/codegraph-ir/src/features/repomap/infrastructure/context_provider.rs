//! Context Provider Infrastructure - Concrete implementations
//!
//! Provides concrete context provider adapters:
//! - Static context (for testing and simple use cases)
//! - Registry for multi-provider fusion
//!
//! Production adapters (IDE, Git, History) would be implemented in application layer.

use crate::features::repomap::domain::context::{
    ContextItem, ContextProvider, ContextSet, ContextType,
};
use std::sync::Arc;

/// Static context provider (for testing and simple cases)
///
/// Returns a pre-defined set of context items.
pub struct StaticContextProvider {
    name: String,
    context_type: ContextType,
    items: Vec<ContextItem>,
}

impl StaticContextProvider {
    /// Create new static provider
    pub fn new(name: String, context_type: ContextType, items: Vec<ContextItem>) -> Self {
        Self {
            name,
            context_type,
            items,
        }
    }
}

impl ContextProvider for StaticContextProvider {
    fn get_context(&self) -> Result<Vec<ContextItem>, String> {
        Ok(self.items.clone())
    }

    fn context_type(&self) -> ContextType {
        self.context_type
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Context Provider Registry
///
/// Aggregates context from multiple providers and fuses them into a single ContextSet.
/// Uses weighted fusion based on ContextSet type_weights.
pub struct ContextProviderRegistry {
    providers: Vec<Arc<dyn ContextProvider>>,
}

impl ContextProviderRegistry {
    /// Create new registry
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a provider
    pub fn register(&mut self, provider: Arc<dyn ContextProvider>) {
        self.providers.push(provider);
    }

    /// Get fused context from all providers
    ///
    /// Collects context from all registered providers and combines them
    /// into a single ContextSet.
    pub fn get_fused_context(&self) -> Result<ContextSet, Vec<String>> {
        let mut context_set = ContextSet::new();
        let mut errors = Vec::new();

        for provider in &self.providers {
            match provider.get_context() {
                Ok(items) => {
                    for item in items {
                        context_set.add_item(item);
                    }
                }
                Err(e) => {
                    errors.push(format!("Provider '{}' failed: {}", provider.name(), e));
                }
            }
        }

        if !errors.is_empty() && context_set.items.is_empty() {
            // All providers failed
            return Err(errors);
        }

        Ok(context_set)
    }

    /// Get context with custom type weights
    pub fn get_fused_context_with_weights(
        &self,
        type_weights: std::collections::HashMap<ContextType, f64>,
    ) -> Result<ContextSet, Vec<String>> {
        let mut context_set = self.get_fused_context()?;
        context_set.type_weights = type_weights;
        Ok(context_set)
    }

    /// Number of registered providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

impl Default for ContextProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
