//! OpenAI chat-completions backend.
//!
//! Posts to `{base_url}/chat/completions` with bearer auth and reads the
//! first choice's text. Works against any API-compatible server.

use super::{
    factory::{ProviderFactory, ProviderSettings},
    secrets::ApiKey,
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default API root; `/chat/completions` is appended.
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions provider; the key only leaves [`ApiKey`] for the auth header.
pub struct OpenAiProvider {
    api_key: ApiKey,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a provider against the public OpenAI endpoint.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: OPENAI_DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Trailing slashes are dropped so the path join stays single-slashed.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Chat-completions request format.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat-completions response format. Every field is optional so that an
/// unexpected but well-formed envelope still yields an (empty) completion.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatCompletionRequest {
            model: &config.model,
            messages: &messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(config.timeout)
            } else {
                ProviderError::HttpError(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChatCompletionResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                return Err(ProviderError::MalformedResponse {
                    reason: e.to_string(),
                    body,
                })
            }
        };

        let usage = envelope
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        let (content, stop_reason) = match envelope.choices.into_iter().next() {
            Some(choice) => (
                choice.message.and_then(|m| m.content).unwrap_or_default(),
                choice.finish_reason,
            ),
            None => (String::new(), None),
        };

        Ok(CompletionResponse {
            content,
            usage,
            model: envelope.model.unwrap_or_else(|| config.model.clone()),
            stop_reason,
        })
    }

    async fn health_check(&self) -> bool {
        !self.api_key.expose().trim().is_empty()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Registers [`OpenAiProvider`] under `"openai"`; rejects scheme-less base URLs.
pub struct OpenAiProviderFactory;

impl ProviderFactory for OpenAiProviderFactory {
    fn kind(&self) -> &'static str {
        "openai"
    }

    fn build(&self, settings: ProviderSettings<'_>) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let mut provider = OpenAiProvider::new(settings.api_key.duplicate());
        if let Some(url) = settings.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ProviderError::NotConfigured(format!(
                    "base_url must start with http:// or https://, got '{url}'"
                )));
            }
            provider = provider.with_base_url(url);
        }
        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> ApiKey {
        ApiKey::parse(raw).unwrap()
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let provider = OpenAiProvider::new(key("k")).with_base_url("http://localhost:9000/v1/");
        assert_eq!(provider.base_url, "http://localhost:9000/v1");
        assert_eq!(OpenAiProvider::new(key("k")).base_url, OPENAI_DEFAULT_BASE_URL);
    }

    #[test]
    fn test_request_omits_unset_max_tokens() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            temperature: 0.2,
            max_tokens: None,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][1]["content"], "u");
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_factory_applies_base_url() {
        let k = key("sk-test");
        let provider = OpenAiProviderFactory
            .build(ProviderSettings {
                api_key: &k,
                base_url: Some("https://proxy.example/v1"),
            })
            .unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_factory_rejects_schemeless_base_url() {
        let k = key("sk-test");
        let result = OpenAiProviderFactory.build(ProviderSettings {
            api_key: &k,
            base_url: Some("proxy.example/v1"),
        });
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let provider = OpenAiProvider::new(key("sk-super-secret-key-12345"));
        let debug_output = format!("{provider:?}");

        assert!(!debug_output.contains("sk-super-secret-key-12345"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
