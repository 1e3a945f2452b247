//! Command-line and environment configuration.
//!
//! Every flag has an environment fallback; `.env` is loaded before parsing.
//! The result is split into the runtime's [`ServiceConfig`] and the HTTP
//! layer's [`ApiConfig`].

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use corrector_runtime::ServiceConfig;

/// Upper bound accepted for the sampling temperature.
const MAX_TEMPERATURE: f32 = 2.0;

#[derive(Debug, Parser)]
#[command(
    name = "corrector",
    version,
    about = "French text correction endpoint backed by an LLM completion API"
)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "CORRECTOR_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Upstream completion provider
    #[arg(long, env = "CORRECTOR_PROVIDER", default_value = "openai")]
    pub provider: String,

    /// Upstream API key; the server starts without it but rejects grading requests
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Custom API root, e.g. a proxy or a compatible server
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Model used for grading
    #[arg(long, env = "CORRECTOR_MODEL", default_value = "gpt-3.5-turbo")]
    pub model: String,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long, env = "CORRECTOR_TEMPERATURE", default_value_t = 0.2, value_parser = parse_temperature)]
    pub temperature: f32,

    /// Maximum completion tokens
    #[arg(long, env = "CORRECTOR_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Timeout for the upstream call (e.g. "30s", "1m")
    #[arg(long, env = "CORRECTOR_UPSTREAM_TIMEOUT", default_value = "30s", value_parser = humantime::parse_duration)]
    pub upstream_timeout: Duration,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "CORRECTOR_MAX_BODY_BYTES", default_value_t = 64 * 1024)]
    pub max_body_bytes: usize,

    /// Comma-separated CORS origins; empty allows any origin
    #[arg(long, env = "CORRECTOR_CORS_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub cors_allowed_origins: Vec<String>,
}

/// HTTP layer settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Whether a browser origin may call the endpoint.
    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.cors_allowed_origins.is_empty()
            || self.cors_allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

impl Cli {
    pub fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig {
            provider: self.provider.clone(),
            base_url: self.openai_base_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: self.upstream_timeout,
            ..ServiceConfig::default()
        };
        if let Some(key) = &self.openai_api_key {
            config = config.with_api_key(key.as_str());
        }
        config
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            max_body_bytes: self.max_body_bytes,
            cors_allowed_origins: self
                .cors_allowed_origins
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }
}

fn parse_temperature(raw: &str) -> Result<f32, String> {
    let value: f32 = raw
        .parse()
        .map_err(|e| format!("invalid temperature {raw}: {e}"))?;
    if !(0.0..=MAX_TEMPERATURE).contains(&value) {
        return Err(format!(
            "temperature must be between 0.0 and {MAX_TEMPERATURE}, got {value}"
        ));
    }
    Ok(value)
}
