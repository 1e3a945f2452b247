//! Service configuration.
//!
//! Built once at process start and handed to
//! [`AnswerValidationService::from_config`](crate::AnswerValidationService::from_config).
//! Nothing in the request path reads the process environment.

use std::time::Duration;

use crate::providers::{ApiKey, CompletionConfig, ProviderSettings};

/// Configuration for the answer validation service.
#[derive(Debug)]
pub struct ServiceConfig {
    /// Provider type registered in the [`ProviderRegistry`](crate::ProviderRegistry)
    pub provider: String,

    /// Upstream API credential; `None` leaves the service misconfigured
    pub api_key: Option<ApiKey>,

    /// Custom API root (provider default when unset)
    pub base_url: Option<String>,

    /// Model to request
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum completion tokens (provider default when unset)
    pub max_tokens: Option<u32>,

    /// Timeout for the single upstream call
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let completion = CompletionConfig::default();
        Self {
            provider: "openai".to_string(),
            api_key: None,
            base_url: None,
            model: completion.model,
            temperature: completion.temperature,
            max_tokens: completion.max_tokens,
            timeout: completion.timeout,
        }
    }
}

impl ServiceConfig {
    /// Set the upstream credential. Blank values are ignored.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = ApiKey::parse(api_key);
        self
    }

    /// Set a custom API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Whether an upstream credential is present.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Per-call completion settings.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }

    /// Factory input; `None` without a credential.
    pub fn provider_settings(&self) -> Option<ProviderSettings<'_>> {
        self.api_key.as_ref().map(|api_key| ProviderSettings {
            api_key,
            base_url: self.base_url.as_deref(),
        })
    }
}
