//! End-to-end tests for `POST /api/generate` and static serving.
//!
//! The upstream text API is replaced by a wiremock server; the router is
//! driven in-process with `oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use prompt_relay::config::{RelaySettings, UpstreamSettings};
use prompt_relay::services::{HttpTextUpstream, PromptRelay};
use prompt_relay::startup::build_router;
use prompt_relay::AppState;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::middleware::security_headers::CONTENT_SECURITY_POLICY;
use std::path::PathBuf;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

fn settings_for(server: &MockServer) -> RelaySettings {
    let mut settings = RelaySettings::default();
    settings.upstream = UpstreamSettings {
        url: Some(format!("{}{}", server.uri(), GENERATE_PATH)),
        api_key: Some(Secret::new("test-key".to_string())),
        timeout_seconds: Some(5),
    };
    settings.frontend.static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static");
    settings
}

fn app_for(settings: &RelaySettings) -> Router {
    let upstream = HttpTextUpstream::new(settings.upstream.clone()).unwrap();
    let relay = Arc::new(PromptRelay::new(Arc::new(upstream)));
    build_router(AppState::new(relay), settings)
}

fn generate_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn well_formed_prompt_is_relayed_and_text_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Write a limerick" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&settings_for(&server));
    let response = app
        .oneshot(generate_request(
            json!({ "prompt": "  Write a limerick  " }).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_SECURITY_POLICY],
        CONTENT_SECURITY_POLICY
    );
    assert_eq!(read_json(response).await, json!({ "text": "Hello" }));
}

#[tokio::test]
async fn flat_content_text_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "text": "flat reply" } }]
        })))
        .mount(&server)
        .await;

    let response = app_for(&settings_for(&server))
        .oneshot(generate_request(json!({ "prompt": "hi" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({ "text": "flat reply" }));
}

#[tokio::test]
async fn blank_or_missing_prompt_is_rejected_without_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for(&settings_for(&server));
    for body in [
        json!({ "prompt": "" }).to_string(),
        json!({ "prompt": "   \t\n" }).to_string(),
        json!({ "prompt": 5 }).to_string(),
        json!({}).to_string(),
        "not json".to_string(),
    ] {
        let response = app.clone().oneshot(generate_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({ "error": "prompt is required" })
        );
    }
}

#[tokio::test]
async fn upstream_failure_becomes_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    let response = app_for(&settings_for(&server))
        .oneshot(generate_request(json!({ "prompt": "hi" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        read_json(response).await,
        json!({ "error": "Upstream text API error", "details": "quota exceeded" })
    );
}

#[tokio::test]
async fn unrecognized_payload_is_returned_raw() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "foo": "bar" })))
        .mount(&server)
        .await;

    let response = app_for(&settings_for(&server))
        .oneshot(generate_request(json!({ "prompt": "hi" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({ "raw": { "foo": "bar" } }));
}

#[tokio::test]
async fn non_json_success_body_is_an_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let response = app_for(&settings_for(&server))
        .oneshot(generate_request(json!({ "prompt": "hi" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Internal server error");
    assert!(body["details"].as_str().unwrap().contains("non-JSON"));
}

#[tokio::test]
async fn missing_upstream_url_is_an_internal_error() {
    let server = MockServer::start().await;
    let mut settings = settings_for(&server);
    settings.upstream.url = None;

    let response = app_for(&settings)
        .oneshot(generate_request(json!({ "prompt": "hi" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["details"], "upstream URL is not configured");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let prompt = "a".repeat(6 * 1024 * 1024);
    let response = app_for(&settings_for(&server))
        .oneshot(generate_request(json!({ "prompt": prompt }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn static_files_are_served_without_relaying() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for(&settings_for(&server));

    for uri in ["/", "/app.js"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        assert_eq!(
            response.headers()[header::CONTENT_SECURITY_POLICY],
            CONTENT_SECURITY_POLICY
        );
    }
}

#[tokio::test]
async fn health_check_works() {
    let server = MockServer::start().await;

    let response = app_for(&settings_for(&server))
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn blank_api_key_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.upstream.api_key = Some(Secret::new(String::new()));

    let response = app_for(&settings)
        .oneshot(generate_request(json!({ "prompt": "hi" }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query_pairs().all(|(name, _)| name != "key"));
}

#[tokio::test]
async fn unreachable_upstream_is_an_internal_error_without_the_key() {
    let closed_port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let server = MockServer::start().await;
    let mut settings = settings_for(&server);
    settings.upstream.url = Some(format!("http://127.0.0.1:{}{}", closed_port, GENERATE_PATH));

    let response = app_for(&settings)
        .oneshot(generate_request(json!({ "prompt": "hi" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Internal server error");
    let details = body["details"].as_str().unwrap();
    assert!(!details.is_empty());
    assert!(!details.contains("test-key"));
}
