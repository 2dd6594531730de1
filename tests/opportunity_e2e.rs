use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode},
    routing::post,
    Json, Router,
};
use campus_backend::config::AppConfig;
use campus_backend::services::{Directory, LlmService, SessionStore};
use campus_backend::utils::RequestLogger;
use campus_backend::{build_app, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

#[derive(Clone)]
struct MockGemini {
    reply: Arc<(StatusCode, Value)>,
    delay: Duration,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn mock_generate(
    State(mock): State<MockGemini>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    mock.seen.lock().unwrap().push((key, body));
    if !mock.delay.is_zero() {
        tokio::time::sleep(mock.delay).await;
    }
    let (status, reply) = mock.reply.as_ref();
    (*status, Json(reply.clone()))
}

async fn spawn_mock_gemini(status: StatusCode, reply: Value) -> (String, MockGemini) {
    spawn_slow_mock_gemini(status, reply, Duration::ZERO).await
}

async fn spawn_slow_mock_gemini(
    status: StatusCode,
    reply: Value,
    delay: Duration,
) -> (String, MockGemini) {
    let mock = MockGemini {
        reply: Arc::new((status, reply)),
        delay,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1beta/models/:model", post(mock_generate))
        .with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), mock)
}

fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn build_test_app(base_url: &str, dir: &Path) -> Router {
    build_test_app_with_timeout(base_url, dir, 5)
}

fn build_test_app_with_timeout(base_url: &str, dir: &Path, timeout_secs: u64) -> Router {
    let config = AppConfig {
        api_key: "test-key-123456789".to_string(),
        base_url: base_url.to_string(),
        model: "gemini-test".to_string(),
        timeout_secs,
        request_log_dir: Some(dir.to_string_lossy().to_string()),
        ..AppConfig::default()
    };
    build_app(Arc::new(AppState::new(
        LlmService::from_config(&config),
        SessionStore::load_or_create(dir.join("session.json")),
        Directory::seeded(),
    )))
}

fn generate_request(profile: &str, activities: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/opportunities/generate")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "studentProfile": profile, "studentActivities": activities }).to_string(),
        ))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn e2e_generate_success_path_returns_opportunities() {
    let (base_url, mock) = spawn_mock_gemini(
        StatusCode::OK,
        gemini_text(r#"{"opportunities":["Mentorship with Jane Doe","AI Research Internship at Acme"]}"#),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(&base_url, dir.path());

    let response = app
        .oneshot(generate_request("CS junior interested in AI", "attended 3 AI webinars"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({ "opportunities": ["Mentorship with Jane Doe", "AI Research Internship at Acme"] })
    );

    let seen = mock.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (key, body) = &seen[0];
    assert_eq!(key.as_deref(), Some("test-key-123456789"));
    assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Student Profile:\nCS junior interested in AI"));

    let logged = RequestLogger::new(Some(dir.path().to_path_buf())).recent(5);
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].status, "success");
    assert_eq!(logged[0].api_key_masked, "test...6789");
}

#[tokio::test]
async fn e2e_fenced_json_output_is_accepted() {
    let (base_url, _mock) = spawn_mock_gemini(
        StatusCode::OK,
        gemini_text("```json\n{\"opportunities\": []}\n```"),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(&base_url, dir.path());

    let response = app.oneshot(generate_request("profile", "activities")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({ "opportunities": [] }));
}

#[tokio::test]
async fn e2e_blocked_prompt_is_bad_gateway() {
    let (base_url, _mock) = spawn_mock_gemini(
        StatusCode::OK,
        json!({ "promptFeedback": { "blockReason": "SAFETY" } }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(&base_url, dir.path());

    let response = app.oneshot(generate_request("profile", "activities")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn e2e_unparseable_output_is_bad_gateway() {
    let (base_url, _mock) =
        spawn_mock_gemini(StatusCode::OK, gemini_text("Here are some ideas: ...")).await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(&base_url, dir.path());

    let response = app.oneshot(generate_request("profile", "activities")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(read_json(response).await["success"], false);
}

#[tokio::test]
async fn e2e_upstream_error_is_not_retried() {
    let (base_url, mock) = spawn_mock_gemini(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "error": { "message": "overloaded" } }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(&base_url, dir.path());

    let response = app.oneshot(generate_request("profile", "activities")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(mock.seen.lock().unwrap().len(), 1);

    let logged = RequestLogger::new(Some(dir.path().to_path_buf())).recent(5);
    assert_eq!(logged[0].status, "error");
    assert_eq!(logged[0].status_code, Some(503));
}

#[tokio::test]
async fn e2e_validation_error_skips_backend() {
    let (base_url, mock) =
        spawn_mock_gemini(StatusCode::OK, gemini_text(r#"{"opportunities":["x"]}"#)).await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(&base_url, dir.path());

    let response = app.oneshot(generate_request("", "some text")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(mock.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn e2e_slow_backend_times_out_as_bad_gateway() {
    let (base_url, mock) = spawn_slow_mock_gemini(
        StatusCode::OK,
        gemini_text(r#"{"opportunities":["too late"]}"#),
        Duration::from_secs(3),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app_with_timeout(&base_url, dir.path(), 1);

    let response = app.oneshot(generate_request("profile", "activities")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(mock.seen.lock().unwrap().len(), 1);

    let logged = RequestLogger::new(Some(dir.path().to_path_buf())).recent(5);
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].status, "error");
    assert_eq!(logged[0].error_type.as_deref(), Some("timeout"));
}
