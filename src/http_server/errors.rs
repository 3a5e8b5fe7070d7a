//! # HTTP API Errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::table::LoadError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("Question cannot be empty")]
    EmptyQuestion,

    #[error("No file provided")]
    MissingFile,

    #[error("File name is required")]
    MissingFileName,

    #[error("Uploaded file is empty")]
    EmptyFile,

    /// Malformed multipart body, or a body over the upload limit
    #[error("Invalid upload: {message}")]
    InvalidUpload { status: StatusCode, message: String },

    #[error("Could not read dataset: {0}")]
    Dataset(#[from] LoadError),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::EmptyQuestion
            | ApiError::MissingFile
            | ApiError::MissingFileName
            | ApiError::EmptyFile => StatusCode::BAD_REQUEST,
            ApiError::InvalidUpload { status, .. } => *status,
            ApiError::Dataset(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Dataset(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::InvalidUpload {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
