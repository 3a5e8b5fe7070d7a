//! Service info and health check routes

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Root response naming the service and its endpoints
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub endpoints: ServiceEndpoints,
}

#[derive(Debug, Serialize)]
pub struct ServiceEndpoints {
    pub ask_question: &'static str,
    pub health_check: &'static str,
}

pub fn health_routes() -> Router {
    Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
}

async fn info_handler() -> impl IntoResponse {
    let info = ServiceInfo {
        message: "tableqa is running".to_string(),
        endpoints: ServiceEndpoints {
            ask_question: "POST /ask",
            health_check: "GET /health",
        },
    };

    (StatusCode::OK, Json(info))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}
