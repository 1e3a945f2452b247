//! Answer validation service.
//!
//! One call to [`AnswerValidationService::validate`] is one grading request:
//! method check, body decoding, credential check, a single upstream
//! completion, then verdict normalization. Every failure is terminal for the
//! request and nothing is retried.

use std::sync::Arc;

use corrector_core::{
    build_grading_prompt, parse_verdict, GradingRequest, GradingVerdict, RequestError,
    SYSTEM_PROMPT,
};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::ServiceConfig;
use crate::providers::{
    ChatMessage, CompletionConfig, LlmProvider, ProviderError, ProviderRegistry,
};

/// Errors from answer validation.
///
/// Each variant maps to one HTTP status and one user-facing message.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("method {method} not allowed, expected POST")]
    MethodNotAllowed { method: String },

    #[error("invalid request: {0}")]
    MissingField(#[from] RequestError),

    #[error("upstream credential is not configured")]
    Misconfigured,

    #[error("upstream returned HTTP {status}")]
    UpstreamError { status: u16, body: String },

    #[error("upstream returned an invalid payload")]
    InvalidUpstreamPayload { raw: String },

    #[error("upstream call failed: {details}")]
    UpstreamUnreachable { details: String },
}

impl ValidationError {
    /// Message shown to the end user.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MethodNotAllowed { .. } => "Méthode non autorisée".to_string(),
            ValidationError::MissingField(_) => {
                "Les champs 'answer' et 'rule' sont obligatoires.".to_string()
            }
            ValidationError::Misconfigured => {
                "OPENAI_API_KEY non configurée sur le serveur".to_string()
            }
            ValidationError::UpstreamError { status, .. } => format!("Erreur OpenAI ({status})"),
            ValidationError::InvalidUpstreamPayload { .. } => {
                "Réponse IA non valide (JSON invalide)".to_string()
            }
            ValidationError::UpstreamUnreachable { .. } => {
                "Erreur serveur lors de l'appel OpenAI".to_string()
            }
        }
    }

    /// Whether the caller, rather than the deployment or upstream, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ValidationError::MethodNotAllowed { .. } | ValidationError::MissingField(_)
        )
    }
}

/// Validates grading requests against an upstream LLM.
///
/// Holds read-only state only and is shared across concurrent requests
/// behind an `Arc`.
pub struct AnswerValidationService {
    provider: Option<Arc<dyn LlmProvider>>,
    completion: CompletionConfig,
}

impl std::fmt::Debug for AnswerValidationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerValidationService")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("completion", &self.completion)
            .finish()
    }
}

impl AnswerValidationService {
    /// Create a service backed by the given provider.
    pub fn new(provider: Arc<dyn LlmProvider>, completion: CompletionConfig) -> Self {
        Self {
            provider: Some(provider),
            completion,
        }
    }

    /// Create a service with no upstream credential.
    ///
    /// Every well-formed request fails with [`ValidationError::Misconfigured`].
    pub fn unconfigured(completion: CompletionConfig) -> Self {
        Self {
            provider: None,
            completion,
        }
    }

    /// Build the service from startup configuration.
    ///
    /// A missing credential does not fail construction: it is a deployment
    /// problem reported on each request. An unknown provider type or an
    /// invalid provider config does fail.
    pub fn from_config(
        config: &ServiceConfig,
        registry: &ProviderRegistry,
    ) -> Result<Self, ProviderError> {
        let completion = config.completion_config();

        if !registry.supports(&config.provider) {
            return Err(ProviderError::NotConfigured(format!(
                "unknown provider '{}', registered: {:?}",
                config.provider,
                registry.kinds()
            )));
        }

        let Some(settings) = config.provider_settings() else {
            warn!(
                provider = %config.provider,
                "upstream credential missing; validation requests will be rejected"
            );
            return Ok(Self::unconfigured(completion));
        };

        let provider = registry.build(&config.provider, settings)?;
        Ok(Self::new(provider, completion))
    }

    /// Whether an upstream provider is configured and reports healthy.
    pub async fn upstream_ready(&self) -> bool {
        match &self.provider {
            Some(provider) => provider.health_check().await,
            None => false,
        }
    }

    /// Validate one raw HTTP request.
    ///
    /// The body is only inspected once the method is known to be `POST`.
    pub async fn validate(
        &self,
        method: &str,
        body: &[u8],
    ) -> Result<GradingVerdict, ValidationError> {
        if !method.eq_ignore_ascii_case("POST") {
            debug!(method, "rejecting non-POST request");
            return Err(ValidationError::MethodNotAllowed {
                method: method.to_string(),
            });
        }

        let request = GradingRequest::from_slice(body).map_err(|e| {
            debug!(error = %e, "rejecting incomplete grading request");
            ValidationError::MissingField(e)
        })?;

        self.grade(&request).await
    }

    /// Grade an already-decoded request.
    pub async fn grade(&self, request: &GradingRequest) -> Result<GradingVerdict, ValidationError> {
        let Some(provider) = &self.provider else {
            error!("upstream API credential missing from configuration");
            return Err(ValidationError::Misconfigured);
        };

        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_grading_prompt(request)),
        ];

        let response = provider
            .complete(messages, &self.completion)
            .await
            .map_err(|e| upstream_failure(provider.name(), e))?;

        debug!(
            provider = provider.name(),
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            stop_reason = response.stop_reason.as_deref().unwrap_or(""),
            "completion received"
        );

        parse_verdict(&response.content).map_err(|e| {
            error!(provider = provider.name(), error = %e, raw = e.raw(), "upstream returned invalid JSON");
            ValidationError::InvalidUpstreamPayload {
                raw: e.raw().to_string(),
            }
        })
    }
}

fn upstream_failure(provider: &str, err: ProviderError) -> ValidationError {
    match err {
        ProviderError::ApiError { status, body } => {
            error!(provider, status, body = %body, "upstream returned non-success status");
            ValidationError::UpstreamError { status, body }
        }
        ProviderError::MalformedResponse { body, reason } => {
            error!(provider, reason = %reason, body = %body, "upstream envelope is not valid JSON");
            ValidationError::UpstreamUnreachable {
                details: format!("{reason}: {body}"),
            }
        }
        ProviderError::NotConfigured(details) => {
            error!(provider, details = %details, "upstream provider not configured");
            ValidationError::Misconfigured
        }
        other @ (ProviderError::HttpError(_) | ProviderError::Timeout(_)) => {
            error!(provider, error = %other, "upstream call failed");
            ValidationError::UpstreamUnreachable {
                details: other.to_string(),
            }
        }
    }
}
