//! # corrector-runtime
//!
//! The answer validation service: validates a grading request, asks an
//! upstream LLM for a verdict, and normalizes the reply.
//!
//! Deterministic pieces (request decoding, prompt, payload parsing) live in
//! `corrector-core`. This crate adds the one network call and the error
//! taxonomy around it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use corrector_runtime::{AnswerValidationService, ProviderRegistry, ServiceConfig};
//!
//! let config = ServiceConfig::default().with_api_key(api_key);
//! let service = AnswerValidationService::from_config(&config, &ProviderRegistry::with_defaults())?;
//!
//! let verdict = service
//!     .validate("POST", br#"{"answer":"Il a manger.","rule":"Corrige."}"#)
//!     .await?;
//! println!("{}", verdict.status);
//! ```

pub mod config;
pub mod providers;
pub mod service;

pub use config::ServiceConfig;
pub use providers::{
    ApiKey, ChatMessage, ChatRole, CompletionConfig, CompletionResponse, LlmProvider,
    ProviderError, ProviderFactory, ProviderRegistry, ProviderSettings, TokenUsage,
};
pub use service::{AnswerValidationService, ValidationError};

#[cfg(feature = "openai")]
pub use providers::{OpenAiProvider, OpenAiProviderFactory};

pub use corrector_core::{GradingRequest, GradingVerdict, VerdictStatus};
