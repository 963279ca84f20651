use askllm_core::{Bridge, BridgeError, BridgeResult, TextGenerator, EMPTY_QUERY_MESSAGE};
use askllm_web::http_server::{router, QueryResponse};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

/// Echoes the prompt back, or fails when the prompt is "fail"
struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> BridgeResult<String> {
        if prompt == "fail" {
            return Err(BridgeError::HttpError {
                status_code: 500,
                message: "upstream exploded".to_string(),
            });
        }
        Ok(format!("echo: {}", prompt))
    }

    fn model_name(&self) -> &str {
        "echo-1"
    }
}

fn app() -> Router {
    router(Bridge::new(Arc::new(EchoGenerator)), "Test").unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_request(body: &'static str) -> Request<Body> {
    Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn json_request(body: &'static str) -> Request<Body> {
    Request::post("/api/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_index_renders_form() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("name=\"query\""));
    assert!(html.contains("echo-1"));
}

#[tokio::test]
async fn test_form_submission_shows_answer() {
    let response = app().oneshot(form_request("query=Hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("echo: Hello"));
    assert!(html.contains("value=\"Hello\""));
}

#[tokio::test]
async fn test_form_answer_is_escaped() {
    let response = app()
        .oneshot(form_request("query=%3Cscript%3Ealert(1)%3C%2Fscript%3E"))
        .await
        .unwrap();

    let html = body_string(response).await;
    assert!(!html.contains("<script>"));
    assert!(html.contains("echo: &lt;script&gt;"));
}

#[tokio::test]
async fn test_form_failure_keeps_page_alive() {
    let response = app().oneshot(form_request("query=fail")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("HTTP 500"));
    assert!(!html.contains("upstream exploded"));
}

#[tokio::test]
async fn test_empty_form_prompts_for_retry() {
    let response = app().oneshot(form_request("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(EMPTY_QUERY_MESSAGE));
}

#[tokio::test]
async fn test_json_query_success() {
    let response = app()
        .oneshot(json_request(r#"{"query": "Hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: QueryResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.response, "echo: Hello");
    assert!(body.error.is_none());
}

#[tokio::test]
async fn test_json_query_failure_reports_error_field() {
    let response = app()
        .oneshot(json_request(r#"{"query": "fail"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let raw = body_string(response).await;
    let body: QueryResponse = serde_json::from_str(&raw).unwrap();
    assert!(body.response.is_empty());
    assert!(body.error.unwrap().contains("HTTP 500"));
    assert!(!raw.contains("upstream exploded"));
}

#[tokio::test]
async fn test_json_empty_query() {
    let response = app()
        .oneshot(json_request(r#"{"query": "  "}"#))
        .await
        .unwrap();

    let body: QueryResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.error.as_deref(), Some(EMPTY_QUERY_MESSAGE));
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "askllm is running");
}
