//! HTTP contract tests: real listener, real client, mocked upstream.

use std::net::SocketAddr;

use corrector_runtime::{AnswerValidationService, CompletionConfig, ProviderRegistry, ServiceConfig};
use corrector_server::{build_router, ApiConfig, AppState};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REQUEST: &str = r#"{"answer":"Il a manger une pomme.","rule":"Corrige la grammaire."}"#;

async fn spawn_app(service: AnswerValidationService, api: ApiConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(AppState::new(service, api));
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });
    addr
}

fn service_for(mock_server: &MockServer) -> AnswerValidationService {
    let config = ServiceConfig::default()
        .with_api_key("test-key")
        .with_base_url(format!("{}/v1", mock_server.uri()));
    AnswerValidationService::from_config(&config, &ProviderRegistry::with_defaults())
        .expect("service config")
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn post(addr: SocketAddr, route: &str, body: &str) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}{route}"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .expect("request");
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn test_get_is_rejected_with_405() {
    let addr = spawn_app(
        AnswerValidationService::unconfigured(CompletionConfig::default()),
        ApiConfig::default(),
    )
    .await;

    let resp = reqwest::get(format!("http://{addr}/validateAnswerAI"))
        .await
        .expect("request");
    assert_eq!(resp.status().as_u16(), 405);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body, json!({"error": "Méthode non autorisée"}));
}

#[tokio::test]
async fn test_missing_rule_is_400() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("{}"))
        .expect(0)
        .mount(&mock_server)
        .await;
    let addr = spawn_app(service_for(&mock_server), ApiConfig::default()).await;

    let (status, body) = post(addr, "/", r#"{"answer":"Bonjour"}"#).await;
    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({"error": "Les champs 'answer' et 'rule' sont obligatoires."})
    );
}

#[tokio::test]
async fn test_missing_key_is_500() {
    let addr = spawn_app(
        AnswerValidationService::unconfigured(CompletionConfig::default()),
        ApiConfig::default(),
    )
    .await;

    let (status, body) = post(addr, "/validateAnswerAI", REQUEST).await;
    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({"error": "OPENAI_API_KEY non configurée sur le serveur"})
    );
}

#[tokio::test]
async fn test_verdict_is_returned_verbatim() {
    let mock_server = MockServer::start().await;
    let reply = r#"{"status":"Conforme","points_positifs":["Accord correct"],"points_a_ameliorer":[],"suggestion":"Rien à corriger."}"#;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion(reply))
        .expect(1)
        .mount(&mock_server)
        .await;
    let addr = spawn_app(service_for(&mock_server), ApiConfig::default()).await;

    let (status, body) = post(addr, "/validateAnswerAI", REQUEST).await;
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::from_str::<Value>(reply).unwrap());
}

#[tokio::test]
async fn test_upstream_failure_carries_details() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;
    let addr = spawn_app(service_for(&mock_server), ApiConfig::default()).await;

    let (status, body) = post(addr, "/", REQUEST).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Erreur OpenAI (401)");
    assert_eq!(body["details"], "invalid api key");
}

#[tokio::test]
async fn test_prose_reply_carries_raw() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion("Voici mon analyse : tout va bien."))
        .mount(&mock_server)
        .await;
    let addr = spawn_app(service_for(&mock_server), ApiConfig::default()).await;

    let (status, body) = post(addr, "/", REQUEST).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Réponse IA non valide (JSON invalide)");
    assert_eq!(body["raw"], "Voici mon analyse : tout va bien.");
}

#[tokio::test]
async fn test_preflight_echoes_allowed_origin() {
    let api = ApiConfig {
        cors_allowed_origins: vec!["https://app.example".to_string()],
        ..ApiConfig::default()
    };
    let addr = spawn_app(
        AnswerValidationService::unconfigured(CompletionConfig::default()),
        api,
    )
    .await;
    let client = reqwest::Client::new();

    let allowed = client
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/validateAnswerAI"))
        .header("origin", "https://app.example")
        .send()
        .await
        .expect("request");
    assert_eq!(allowed.status().as_u16(), 204);
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://app.example"
    );
    assert_eq!(
        allowed.headers()["access-control-allow-methods"],
        "POST,OPTIONS"
    );

    let denied = client
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/validateAnswerAI"))
        .header("origin", "https://other.example")
        .send()
        .await
        .expect("request");
    assert_eq!(denied.status().as_u16(), 204);
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_healthz_reports_upstream_configuration() {
    let addr = spawn_app(
        AnswerValidationService::unconfigured(CompletionConfig::default()),
        ApiConfig::default(),
    )
    .await;

    let body: Value = reqwest::get(format!("http://{addr}/healthz"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json body");
    assert_eq!(body, json!({"status": "ok", "upstream_configured": false}));
}

#[tokio::test]
async fn test_oversized_body_is_413_json() {
    let api = ApiConfig {
        max_body_bytes: 64,
        ..ApiConfig::default()
    };
    let addr = spawn_app(
        AnswerValidationService::unconfigured(CompletionConfig::default()),
        api,
    )
    .await;

    let big = format!(r#"{{"answer":"{}","rule":"r"}}"#, "a".repeat(512));
    let (status, body) = post(addr, "/", &big).await;
    assert_eq!(status, 413);
    assert_eq!(body["error"], "Requête trop volumineuse");
}
