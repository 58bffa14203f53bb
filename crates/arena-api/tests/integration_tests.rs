//! HTTP-level tests driving the router with `oneshot`

use std::sync::Arc;
use std::time::Duration;

use arena_api::{ArenaServer, ServerConfig};
use arena_core::Coach;
use arena_llm::{GeminiProvider, LlmError, LlmProvider, MockProvider, SimulatedProvider};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(llm: Arc<dyn LlmProvider>) -> Router {
    ArenaServer::new(ServerConfig::default(), Arc::new(Coach::new(llm))).router()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn post_raw(app: &Router, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app_with(Arc::new(SimulatedProvider::new()));

    for uri in ["/", "/health"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider"], "simulated");
        assert!(body["version"].is_string());
    }
}

#[tokio::test]
async fn test_chat_train_then_score_flow() {
    let app = app_with(Arc::new(SimulatedProvider::new()));

    let (status, first) = send(&app, Method::POST, "/chat", Some(json!({"message": "Bonjour"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(first["text"].as_str().unwrap().contains("Argument enregistré"));
    let session_id = first["session_id"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&session_id).is_ok());

    let (status, argument) = send(
        &app,
        Method::POST,
        "/chat",
        Some(json!({
            "message": "Le télétravail améliore la productivité, car les trajets disparaissent.",
            "mode": "score",
            "session_id": session_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(argument["session_id"], session_id.as_str());

    let (status, report) = send(
        &app,
        Method::POST,
        "/chat",
        Some(json!({"message": "fin", "mode": "score", "session_id": session_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(report["text"].as_str().unwrap().contains("Score final du débat"));

    let (status, snapshot) = send(&app, Method::GET, &format!("/session/{}", session_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["turns"].as_array().unwrap().len(), 6);
    assert_eq!(snapshot["evaluations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_mode_is_rejected() {
    let app = app_with(Arc::new(MockProvider::constant("ok")));

    let (status, body) = send(
        &app,
        Method::POST,
        "/chat",
        Some(json!({"message": "Bonjour", "mode": "duel"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let llm = Arc::new(MockProvider::constant("ok"));
    let app = app_with(llm.clone());

    let (status, body) = send(&app, Method::POST, "/chat", Some(json!({"message": "   "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_collaborator_failure_maps_to_503() {
    let app = app_with(Arc::new(MockProvider::failing(LlmError::RateLimited)));

    let (status, body) = send(&app, Method::POST, "/chat", Some(json!({"message": "Bonjour"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Erreur génération IA"));
}

#[tokio::test]
async fn test_session_clear_and_lookup() {
    let app = app_with(Arc::new(MockProvider::constant("ok")));

    let (status, _) = send(
        &app,
        Method::POST,
        "/chat",
        Some(json!({"message": "Bonjour", "session_id": "atelier"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, snapshot) = send(&app, Method::GET, "/session/atelier", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["session_id"], "atelier");

    let (status, _) = send(&app, Method::DELETE, "/session/atelier", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/session/atelier", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // Clearing twice, or an unknown id, is not an error
    let (status, _) = send(&app, Method::DELETE, "/session/atelier", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = app_with(Arc::new(MockProvider::constant("ok")));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_missing_message_field_uses_error_envelope() {
    let app = app_with(Arc::new(MockProvider::constant("ok")));

    let (status, body) = post_raw(&app, r#"{"mode": "train"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("message"));
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let app = app_with(Arc::new(MockProvider::constant("ok")));

    let (status, body) = post_raw(&app, "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_slow_collaborator_times_out_with_envelope() {
    let llm = Arc::new(MockProvider::constant("trop tard").with_latency(Duration::from_secs(5)));
    let config = ServerConfig {
        timeout: Duration::from_millis(50),
        ..ServerConfig::default()
    };
    let app = ArenaServer::new(config, Arc::new(Coach::new(llm))).router();

    let (status, body) = send(&app, Method::POST, "/chat", Some(json!({"message": "Bonjour"}))).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"]["code"], "TIMEOUT");
}

#[tokio::test]
async fn test_connection_failure_does_not_leak_api_key() {
    let llm = Arc::new(GeminiProvider::flash("SECRETKEY123").with_base_url("http://127.0.0.1:9"));
    let app = app_with(llm);

    let (status, body) = send(&app, Method::POST, "/chat", Some(json!({"message": "Bonjour"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(!body.to_string().contains("SECRETKEY123"), "{}", body);
}
