//! Integration tests for the pitch-relay API
//!
//! Tests cover:
//! - Preflight and method guard
//! - Missing `audio` field
//! - Forwarding to the pitch service (field name, filename, bytes)
//! - Success pass-through, failure relay, and the 500 fallback
//! - CORS headers on every response
//! - Health endpoint

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::Multipart,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use pitch_relay::{build_router, AppState, RelayConfig};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

const BOUNDARY: &str = "pitch-relay-test-boundary";
const RELAY_PATH: &str = "/functions/v1/extract-pitch";

const SUCCESS_BODY: &str = r#"{"success":true,"metadata":{"sample_rate":22050,"duration_seconds":1.25,"filename":"hum.wav"},"pitch_contour":{"times":[0.0,0.01],"frequencies":[440.0,441.5],"confidence":[0.9,0.85]},"note_events":[]}"#;

/// Test helper: Serve `app` on an ephemeral local port, return its base URL
async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Test helper: Fake pitch service answering every POST with a fixed reply
async fn spawn_service(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route(
        "/api/pitch",
        post(move || async move { (status, [(CONTENT_TYPE, "application/json")], body) }),
    );
    spawn_server(app).await
}

/// Test helper: Base URL where nothing is listening
async fn unreachable_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Test helper: Relay router pointed at `service_url`
fn setup_app(service_url: &str, validate_response: bool) -> Router {
    let config = RelayConfig {
        service_url: service_url.to_string(),
        validate_response,
        ..RelayConfig::default()
    };
    build_router(AppState::new(config).unwrap())
}

/// Test helper: Multipart body with a single file field
fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: audio/wav\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post_multipart(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(RELAY_PATH)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn post_audio() -> Request<Body> {
    post_multipart(multipart_body("audio", "hum.wav", b"RIFF....WAVEfmt "))
}

/// Test helper: Extract raw body bytes from response
async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).expect("Should parse JSON")
}

fn assert_cors(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-headers"],
        "authorization, x-client-info, apikey, content-type"
    );
}

// =============================================================================
// Preflight and method guard
// =============================================================================

#[tokio::test]
async fn test_options_preflight_returns_ok() {
    let app = setup_app(&unreachable_service().await, false);

    // Garbage body without a content type: must not be parsed
    let request = Request::builder()
        .method("OPTIONS")
        .uri(RELAY_PATH)
        .body(Body::from("\u{0}not multipart"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);
    assert_eq!(body_bytes(response.into_body()).await, b"ok");
}

#[tokio::test]
async fn test_other_methods_rejected() {
    let service_url = unreachable_service().await;

    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let app = setup_app(&service_url, false);
        let request = Request::builder()
            .method(method)
            .uri(RELAY_PATH)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_cors(&response);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body, serde_json::json!({"error": "Method not allowed"}));
    }
}

// =============================================================================
// Payload extraction
// =============================================================================

#[tokio::test]
async fn test_missing_audio_field() {
    let app = setup_app(&unreachable_service().await, false);

    let request = post_multipart(multipart_body("recording", "hum.wav", b"data"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors(&response);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, serde_json::json!({"error": "No audio file provided"}));
}

#[tokio::test]
async fn test_malformed_multipart_is_internal_error() {
    let app = setup_app(&unreachable_service().await, false);

    let request = Request::builder()
        .method("POST")
        .uri(RELAY_PATH)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"audio":"nope"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    let body = extract_json(response.into_body()).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

// =============================================================================
// Forwarding
// =============================================================================

#[tokio::test]
async fn test_audio_forwarded_under_same_field() {
    let received: Arc<Mutex<Option<(String, Option<String>, Vec<u8>)>>> =
        Arc::new(Mutex::new(None));
    let captured = received.clone();

    let service = Router::new().route(
        "/api/pitch",
        post(move |mut multipart: Multipart| {
            let captured = captured.clone();
            async move {
                let field = multipart.next_field().await.unwrap().unwrap();
                let name = field.name().unwrap_or_default().to_string();
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.unwrap().to_vec();
                *captured.lock().unwrap() = Some((name, file_name, data));
                ([(CONTENT_TYPE, "application/json")], SUCCESS_BODY).into_response()
            }
        }),
    );
    let service_url = spawn_server(service).await;
    let app = setup_app(&service_url, false);

    let response = app.oneshot(post_audio()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (name, file_name, data) = received.lock().unwrap().take().expect("service was called");
    assert_eq!(name, "audio");
    assert_eq!(file_name.as_deref(), Some("hum.wav"));
    assert_eq!(data, b"RIFF....WAVEfmt ");
}

#[tokio::test]
async fn test_success_body_relayed_verbatim() {
    let service_url = spawn_service(StatusCode::OK, SUCCESS_BODY).await;
    let app = setup_app(&service_url, false);

    let response = app.oneshot(post_audio()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(body_bytes(response.into_body()).await, SUCCESS_BODY.as_bytes());
}

#[tokio::test]
async fn test_service_error_relayed_with_its_status() {
    let service_url =
        spawn_service(StatusCode::BAD_GATEWAY, r#"{"error": "service unavailable"}"#).await;
    let app = setup_app(&service_url, false);

    let response = app.oneshot(post_audio()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_cors(&response);
    assert_eq!(
        body_bytes(response.into_body()).await,
        br#"{"error":"service unavailable"}"#
    );
}

#[tokio::test]
async fn test_service_error_without_message_uses_fallback() {
    let service_url = spawn_service(StatusCode::BAD_REQUEST, r#"{"success": false}"#).await;
    let app = setup_app(&service_url, false);

    let response = app.oneshot(post_audio()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Failed to extract pitch");
}

#[tokio::test]
async fn test_unparseable_service_error_becomes_500() {
    let service_url = spawn_service(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>").await;
    let app = setup_app(&service_url, false);

    let response = app.oneshot(post_audio()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    let body = extract_json(response.into_body()).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_service_becomes_500() {
    let app = setup_app(&unreachable_service().await, false);

    let response = app.oneshot(post_audio()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    let body = extract_json(response.into_body()).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

// =============================================================================
// Response shape checking
// =============================================================================

#[tokio::test]
async fn test_shape_check_accepts_valid_result() {
    let service_url = spawn_service(StatusCode::OK, SUCCESS_BODY).await;
    let app = setup_app(&service_url, true);

    let response = app.oneshot(post_audio()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, SUCCESS_BODY.as_bytes());
}

#[tokio::test]
async fn test_shape_check_rejects_uneven_contour() {
    let uneven = r#"{"success":true,"metadata":{"sample_rate":22050,"duration_seconds":1.0,"filename":"a.wav"},"pitch_contour":{"times":[0.0,0.01],"frequencies":[440.0],"confidence":[0.9,0.8]},"note_events":[]}"#;
    let service_url = spawn_service(StatusCode::OK, uneven).await;
    let app = setup_app(&service_url, true);

    let response = app.oneshot(post_audio()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_cors(&response);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("contour"));
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(&unreachable_service().await, false);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "pitch-relay");
    assert!(body["version"].is_string());
}
