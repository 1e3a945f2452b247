use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use crate::http::response::{body_rejection_response, validation_error_response};
use crate::AppState;

/// The grading endpoint. Accepts any method so that the service itself
/// decides on `405`, before the body is looked at.
#[tracing::instrument(name = "validate_answer", skip_all, fields(method = %method))]
pub(crate) async fn validate_answer_handler(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let started = Instant::now();

    let body = match body {
        Ok(body) => body,
        Err(rejection) if method == Method::POST => {
            warn!(error = %rejection, "request body rejected");
            return body_rejection_response(&rejection, state.api.max_body_bytes);
        }
        // The method check below never reads the body.
        Err(_) => Bytes::new(),
    };

    let resp = match state.service.validate(method.as_str(), &body).await {
        Ok(verdict) => (StatusCode::OK, Json(verdict)).into_response(),
        Err(err) => validation_error_response(&err),
    };

    info!(
        status = resp.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    resp
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> Response {
    let upstream_configured = state.service.upstream_ready().await;
    Json(json!({
        "status": "ok",
        "upstream_configured": upstream_configured,
    }))
    .into_response()
}
