//! End-to-end tests for the HTTP API
//!
//! - GET /api/v1/health
//! - GET /api/v1/documents/list
//! - POST /api/v1/documents/index
//! - POST /api/v1/chat/message
//! - error mapping for failing backends

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use notebook_adaptor_web::{ApiServerConfig, NotebookApiServer};
use notebook_core::*;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

// ============================================================================
// Test Setup
// ============================================================================

fn demo_router() -> Router {
    let backend = DemoBackend::new().with_latency(LatencyProfile::instant());
    NotebookApiServer::new(ApiServerConfig::default(), Arc::new(backend)).router()
}

/// Backend whose every call fails with a copy of the given error
struct FailingBackend {
    kind: &'static str,
}

impl FailingBackend {
    fn error(&self) -> NotebookError {
        match self.kind {
            "upstream" => NotebookError::upstream(500, "internal server error"),
            "malformed" => NotebookError::malformed("missing field `response`"),
            "validation" => NotebookError::validation("folder does not exist"),
            _ => NotebookError::Io(std::io::Error::other("unexpected")),
        }
    }
}

#[async_trait]
impl NotebookBackend for FailingBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Live
    }

    async fn health(&self, _cancel: CancellationToken) -> Result<HealthReport> {
        Err(self.error())
    }

    async fn list_documents(
        &self,
        _limit: usize,
        _cancel: CancellationToken,
    ) -> Result<DocumentListing> {
        Err(self.error())
    }

    async fn index_folder(
        &self,
        _request: IndexRequest,
        _cancel: CancellationToken,
    ) -> Result<IndexReport> {
        Err(self.error())
    }

    async fn chat(&self, _request: ChatRequest, _cancel: CancellationToken) -> Result<ChatAnswer> {
        Err(self.error())
    }
}

fn failing_router(kind: &'static str) -> Router {
    NotebookApiServer::new(ApiServerConfig::default(), Arc::new(FailingBackend { kind })).router()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Demo backend
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(demo_router(), get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["ollama"], "connected");
    assert_eq!(body["services"]["models"]["embedding"], "all-minilm:l6-v2");
    assert_eq!(body["database"]["document_count"], 5);
    assert_eq!(body["system"]["ram_percent"], 38.8);
}

#[tokio::test]
async fn test_list_documents_endpoint() {
    let (status, body) = send(demo_router(), get("/api/v1/documents/list?limit=100")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"].as_array().unwrap().len(), 5);
    assert_eq!(body["total"], 5);
    assert_eq!(body["limit"], 100);

    let (_, body) = send(demo_router(), get("/api/v1/documents/list?limit=3")).await;
    assert_eq!(body["documents"].as_array().unwrap().len(), 3);
    assert_eq!(body["total"], 5);

    let (_, body) = send(demo_router(), get("/api/v1/documents/list")).await;
    assert_eq!(body["limit"], 100);
}

#[tokio::test]
async fn test_index_endpoint() {
    let request = post(
        "/api/v1/documents/index",
        json!({ "folder_path": "~/Documents/Research", "recursive": true, "file_types": null }),
    );
    let (status, body) = send(demo_router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["folder_path"], "~/Documents/Research");
    assert_eq!(body["indexed_files"], 5);
    assert_eq!(body["total_chunks"], 93);
    assert_eq!(body["processing_time"], 2.847);
    assert_eq!(body["errors"], json!([]));
}

#[tokio::test]
async fn test_chat_endpoint() {
    let request = post(
        "/api/v1/chat/message",
        json!({ "message": "What is machine learning?", "stream": false }),
    );
    let (status, body) = send(demo_router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("**Machine learning**"));
    assert_eq!(
        body["sources"][0],
        json!({ "filename": "Machine_Learning_Basics.pdf", "relevance_score": 0.94, "page_number": 3 })
    );
    assert_eq!(body["sources"][1]["page_number"], Value::Null);
}

#[tokio::test]
async fn test_streaming_chat_is_rejected() {
    let request = post("/api/v1/chat/message", json!({ "message": "hi", "stream": true }));
    let (status, body) = send(demo_router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_malformed_json_body_uses_error_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/chat/message")
        .header("content-type", "application/json")
        .body(Body::from("{\"message\": "))
        .unwrap();
    let (status, body) = send(demo_router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 400);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_field_and_content_type_use_error_envelope() {
    let request = post("/api/v1/documents/index", json!({ "recursive": true }));
    let (status, body) = send(demo_router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/chat/message")
        .body(Body::from("{\"message\": \"hi\"}"))
        .unwrap();
    let (status, body) = send(demo_router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_route() {
    let response = demo_router()
        .oneshot(get("/api/v2/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let request = post("/api/v1/chat/message", json!({ "message": "hi" }));
    let (status, body) = send(failing_router("upstream"), request).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 502);
    assert!(body["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_malformed_payload_is_bad_gateway() {
    let (status, _) = send(failing_router("malformed"), get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_validation_failure_is_bad_request() {
    let request = post("/api/v1/documents/index", json!({ "folder_path": "/nope" }));
    let (status, body) = send(failing_router("validation"), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("folder does not exist"));
}

#[tokio::test(start_paused = true)]
async fn test_slow_backend_is_gateway_timeout() {
    let config = ApiServerConfig {
        request_timeout: Duration::from_millis(500),
        ..ApiServerConfig::default()
    };
    // Realistic demo latency: chat takes at least one second
    let router = NotebookApiServer::new(config, Arc::new(DemoBackend::new())).router();
    let request = post("/api/v1/chat/message", json!({ "message": "hi" }));
    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["code"], 504);
}
