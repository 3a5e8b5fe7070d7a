//! # HTTP Server Module
//!
//! Axum server exposing the question answering flow.
//!
//! # Endpoints
//!
//! - `GET /` - Service info
//! - `GET /health` - Health check
//! - `POST /ask` - Multipart upload (`file`, `question`), answered as JSON

mod ask_routes;
mod config;
mod errors;
mod health_routes;
mod server;

pub use ask_routes::AskState;
pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use health_routes::{HealthResponse, ServiceEndpoints, ServiceInfo};
pub use server::HttpServer;
