//! Provider registry.
//!
//! Each backend registers a [`ProviderFactory`] under a short kind name
//! (`"openai"`). The service picks one by the kind named in its
//! configuration, so a compatible backend can be added without touching
//! the grading path.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::secrets::ApiKey;
use super::{LlmProvider, ProviderError};

/// What a factory needs to build a provider instance.
#[derive(Debug, Clone, Copy)]
pub struct ProviderSettings<'a> {
    pub api_key: &'a ApiKey,
    /// API root override; the provider's public endpoint when `None`
    pub base_url: Option<&'a str>,
}

/// Builds provider instances of one kind.
pub trait ProviderFactory: Send + Sync {
    /// Registry key, e.g. `"openai"`.
    fn kind(&self) -> &'static str;

    /// Create a provider from settings.
    fn build(&self, settings: ProviderSettings<'_>) -> Result<Arc<dyn LlmProvider>, ProviderError>;
}

/// Registry of available provider factories.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<&'static str, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every backend compiled into this build.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "openai")]
        registry.register(Arc::new(super::OpenAiProviderFactory));
        registry
    }

    /// Later registrations replace earlier ones of the same kind.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories.insert(factory.kind(), factory);
    }

    /// Whether a factory is registered for `kind`.
    pub fn supports(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Build a provider of the given kind.
    pub fn build(
        &self,
        kind: &str,
        settings: ProviderSettings<'_>,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        match self.factories.get(kind) {
            Some(factory) => factory.build(settings),
            None => Err(ProviderError::NotConfigured(format!(
                "unknown provider '{kind}', registered: {:?}",
                self.kinds()
            ))),
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
