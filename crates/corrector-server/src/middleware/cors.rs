use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::AppState;

const ALLOW_METHODS: &str = "POST,OPTIONS";
const ALLOW_HEADERS: &str = "content-type,authorization";
const MAX_ORIGIN_LEN: usize = 256;

fn request_origin(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("origin")?.to_str().ok()?.trim();
    if value.is_empty() || value.len() > MAX_ORIGIN_LEN {
        return None;
    }
    Some(value.to_string())
}

fn apply_cors_headers(resp: &mut Response, origin: &str, preflight: bool) {
    if let Ok(v) = HeaderValue::from_str(origin) {
        resp.headers_mut().insert("access-control-allow-origin", v);
    }
    resp.headers_mut()
        .insert("vary", HeaderValue::from_static("Origin"));
    if preflight {
        resp.headers_mut().insert(
            "access-control-allow-methods",
            HeaderValue::from_static(ALLOW_METHODS),
        );
        resp.headers_mut().insert(
            "access-control-allow-headers",
            HeaderValue::from_static(ALLOW_HEADERS),
        );
    }
}

/// Answers preflights with `204` and echoes allowed origins on every response.
pub(crate) async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = request_origin(req.headers()).filter(|o| state.api.origin_allowed(o));

    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if let Some(origin) = origin.as_deref() {
            apply_cors_headers(&mut resp, origin, true);
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if let Some(origin) = origin.as_deref() {
        apply_cors_headers(&mut resp, origin, false);
    }
    resp
}
