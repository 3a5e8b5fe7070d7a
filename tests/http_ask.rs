//! HTTP Ask Route Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`:
//! - service info and health check
//! - multipart uploads answered end to end
//! - upload validation and dataset rejection status codes

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tableqa::http_server::{HttpServer, HttpServerConfig};
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

const BOUNDARY: &str = "tableqa-test-boundary";

const PASSENGERS: &str = "Survived,Sex,Pclass\n1,female,1\n0,male,3\n0,male,3\n0,female,2\n";

fn router() -> Router {
    HttpServer::with_config(HttpServerConfig::default()).router()
}

/// One multipart part: (name, optional filename, content)
type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn ask_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Service Info and Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_service_info() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "tableqa is running");
    assert_eq!(
        body["endpoints"],
        json!({"ask_question": "POST /ask", "health_check": "GET /health"})
    );
}

// =============================================================================
// Answered Questions
// =============================================================================

#[tokio::test]
async fn test_percentage_question() {
    let request = ask_request(&[
        ("file", Some("titanic.csv"), PASSENGERS.as_bytes()),
        ("question", None, "What percentage of passengers survived?".as_bytes()),
    ]);
    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"], "What percentage of passengers survived?");
    assert_eq!(body["answer"], json!(25.0));
    assert_eq!(body["analysis_type"], "percentage");
    assert_eq!(
        body["dataset_info"],
        json!({"rows": 4, "columns": 3, "file_type": "csv"})
    );
}

#[tokio::test]
async fn test_compare_question() {
    let request = ask_request(&[
        ("question", None, "What was the survival rate by gender?".as_bytes()),
        ("file", Some("titanic.csv"), PASSENGERS.as_bytes()),
    ]);
    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analysis_type"], "compare");
    assert_eq!(body["answer"], json!({"female": 50.0, "male": 0.0}));
}

#[tokio::test]
async fn test_unrecognized_question_asks_to_rephrase() {
    let request = ask_request(&[
        ("file", Some("titanic.csv"), PASSENGERS.as_bytes()),
        ("question", None, "Tell me a story".as_bytes()),
    ]);
    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], Value::Null);
    assert_eq!(body["analysis_type"], "clarify");
    assert!(!body["explanation"].as_str().unwrap().is_empty());
}

// =============================================================================
// Upload Validation
// =============================================================================

#[tokio::test]
async fn test_blank_question() {
    let request = ask_request(&[
        ("file", Some("titanic.csv"), PASSENGERS.as_bytes()),
        ("question", None, "   ".as_bytes()),
    ]);
    let (status, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Question cannot be empty", "code": 400}));
}

#[tokio::test]
async fn test_missing_file() {
    let request = ask_request(&[("question", None, "How many passengers?".as_bytes())]);
    let (status, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn test_empty_file() {
    let request = ask_request(&[
        ("file", Some("titanic.csv"), "".as_bytes()),
        ("question", None, "How many passengers?".as_bytes()),
    ]);
    let (status, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Uploaded file is empty");
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let request = ask_request(&[
        ("file", Some("titanic.xlsx"), PASSENGERS.as_bytes()),
        ("question", None, "How many passengers?".as_bytes()),
    ]);
    let (status, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Unsupported file type"));
}

#[tokio::test]
async fn test_not_multipart() {
    let request = Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"question": "How many passengers?"}"#))
        .unwrap();
    let (status, _) = send(router(), request).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_upload_over_limit() {
    let config = HttpServerConfig {
        max_upload_bytes: 64,
        ..HttpServerConfig::default()
    };
    let app = HttpServer::with_config(config).router();
    let large = PASSENGERS.repeat(20);
    let request = ask_request(&[
        ("file", Some("titanic.csv"), large.as_bytes()),
        ("question", None, "How many passengers?".as_bytes()),
    ]);
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
