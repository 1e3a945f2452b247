//! Completion backends.
//!
//! [`LlmProvider`] is the seam between the grading service and a chat
//! completion API. Backends are built through the [`ProviderRegistry`];
//! the OpenAI one ships behind the `openai` feature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

mod factory;
pub mod secrets;

#[cfg(feature = "openai")]
mod openai;

pub use factory::{ProviderFactory, ProviderRegistry, ProviderSettings};
pub use secrets::ApiKey;

#[cfg(feature = "openai")]
pub use openai::{OpenAiProvider, OpenAiProviderFactory, OPENAI_DEFAULT_BASE_URL};

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Connection, TLS or body read failure.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Non-2xx answer; `body` is the upstream text, untouched.
    #[error("API error: {status} - {body}")]
    ApiError { status: u16, body: String },

    /// 2xx answer whose envelope is not the expected JSON.
    #[error("Malformed API response: {reason}")]
    MalformedResponse { body: String, reason: String },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Per-call settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub model: String,
    /// Provider default when unset
    pub max_tokens: Option<u32>,
    pub temperature: f32,
    /// Covers the whole call, body read included
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: None,
            temperature: 0.2,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Author of a chat message, serialized lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// A chat message for completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Response from a completion.
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// First choice's text; empty when the API returned none
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
    pub stop_reason: Option<String>,
}

/// Token usage reported by the upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// A chat completion backend.
///
/// One HTTP call per [`complete`](Self::complete), never retried.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Local readiness only; no network probe.
    async fn health_check(&self) -> bool;

    /// Provider name for logs.
    fn name(&self) -> &str;
}
