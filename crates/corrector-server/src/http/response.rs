use axum::extract::rejection::{BytesRejection, FailedToBufferBody};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use corrector_runtime::ValidationError;
use serde_json::json;

#[must_use]
pub(crate) fn validation_error_status(err: &ValidationError) -> StatusCode {
    match err {
        ValidationError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        ValidationError::MissingField(_) => StatusCode::BAD_REQUEST,
        ValidationError::Misconfigured
        | ValidationError::UpstreamError { .. }
        | ValidationError::InvalidUpstreamPayload { .. }
        | ValidationError::UpstreamUnreachable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body: `error` always, plus `details` or `raw` for upstream failures.
#[must_use]
pub(crate) fn validation_error_response(err: &ValidationError) -> Response {
    let mut body = json!({ "error": err.user_message() });
    match err {
        ValidationError::UpstreamError { body: details, .. }
        | ValidationError::UpstreamUnreachable { details } => {
            body["details"] = json!(details);
        }
        ValidationError::InvalidUpstreamPayload { raw } => {
            body["raw"] = json!(raw);
        }
        _ => {}
    }

    let status = validation_error_status(err);
    let mut resp = (status, Json(body)).into_response();
    if status == StatusCode::METHOD_NOT_ALLOWED {
        resp.headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("POST, OPTIONS"));
    }
    resp
}

/// `413` when the body limit was hit, `400` for any other unreadable body.
#[must_use]
pub(crate) fn body_rejection_response(rejection: &BytesRejection, limit: usize) -> Response {
    match rejection {
        BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
            payload_too_large_response(limit)
        }
        other => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Corps de requête illisible",
                "details": other.body_text(),
            })),
        )
            .into_response(),
    }
}

#[must_use]
fn payload_too_large_response(limit: usize) -> Response {
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(json!({
            "error": "Requête trop volumineuse",
            "details": format!("body exceeds {limit} bytes"),
        })),
    )
        .into_response()
}
