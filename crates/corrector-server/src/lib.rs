//! # corrector-server
//!
//! HTTP surface for the answer validation service. One grading route
//! (served on `/` and `/validateAnswerAI`), a liveness probe, and CORS.

pub mod config;
mod http;
mod middleware;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get};
use axum::Router;
use corrector_runtime::AnswerValidationService;

pub use config::{ApiConfig, Cli};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnswerValidationService>,
    pub api: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(service: AnswerValidationService, api: ApiConfig) -> Self {
        Self {
            service: Arc::new(service),
            api: Arc::new(api),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.api.max_body_bytes;
    Router::new()
        .route("/", any(http::handlers::validate_answer_handler))
        .route(
            "/validateAnswerAI",
            any(http::handlers::validate_answer_handler),
        )
        .route("/healthz", get(http::handlers::healthz_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::cors::cors_middleware,
        ))
        .with_state(state)
}
