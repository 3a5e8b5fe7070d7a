//! # Ask Route
//!
//! `POST /ask` takes a multipart body with a `file` part (CSV or SQLite) and
//! a `question` part, and answers the question against the uploaded table.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};

use crate::api::{AskHandler, AskResponse};
use crate::observability::{log_event_with_fields, Event};
use crate::table::{load_path, FileType, LoadError, LoadOptions};

use super::errors::{ApiError, ApiResult};

/// Shared state of the ask route
pub struct AskState {
    pub handler: AskHandler,
    pub load: LoadOptions,
}

impl AskState {
    pub fn new(handler: AskHandler, load: LoadOptions) -> Self {
        Self { handler, load }
    }
}

pub fn ask_routes(state: Arc<AskState>) -> Router {
    Router::new()
        .route("/ask", post(ask_handler))
        .with_state(state)
}

/// Parts of a validated upload
struct Upload {
    question: String,
    filename: String,
    data: Bytes,
}

async fn ask_handler(
    State(state): State<Arc<AskState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<AskResponse>> {
    let mut multipart = multipart.map_err(|rejection| ApiError::InvalidUpload {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    let upload = read_upload(&mut multipart).await?;
    let size = upload.data.len().to_string();
    log_event_with_fields(
        Event::AskReceived,
        &[("bytes", size.as_str()), ("filename", upload.filename.as_str())],
    );

    let response = tokio::task::spawn_blocking(move || answer_upload(&state, upload))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    log_event_with_fields(Event::AskAnswered, &[("op", response.analysis_type.as_str())]);
    Ok(Json(response))
}

async fn read_upload(multipart: &mut Multipart) -> ApiResult<Upload> {
    let mut question: Option<String> = None;
    let mut file: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                file = Some((filename, data));
            }
            Some("question") => question = Some(field.text().await?),
            _ => {}
        }
    }

    let question = question
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::EmptyQuestion)?;
    let (filename, data) = file.ok_or(ApiError::MissingFile)?;
    let filename = filename
        .filter(|f| !f.trim().is_empty())
        .ok_or(ApiError::MissingFileName)?;
    if data.is_empty() {
        return Err(ApiError::EmptyFile);
    }

    Ok(Upload {
        question,
        filename,
        data,
    })
}

/// Loads the upload from a temporary file and answers the question
///
/// Runs on the blocking pool; the temporary file is removed on return.
fn answer_upload(state: &AskState, upload: Upload) -> ApiResult<AskResponse> {
    let original = Path::new(&upload.filename);
    let file_type = FileType::from_path(original).map_err(|e| reject(&upload.filename, e))?;

    let suffix = original
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
        .prefix("tableqa-upload-")
        .suffix(&suffix)
        .tempfile()
        .map_err(LoadError::from)?;
    temp.write_all(&upload.data).map_err(LoadError::from)?;
    temp.flush().map_err(LoadError::from)?;

    let mut dataset = load_path(temp.path(), &state.load).map_err(|e| reject(&upload.filename, e))?;
    dataset.meta.filename = Some(upload.filename.clone());

    let rows = dataset.table.row_count().to_string();
    let columns = dataset.table.column_count().to_string();
    log_event_with_fields(
        Event::DatasetLoaded,
        &[
            ("columns", columns.as_str()),
            ("file_type", file_type.as_str()),
            ("rows", rows.as_str()),
        ],
    );

    Ok(state.handler.answer(&upload.question, &dataset))
}

fn reject(filename: &str, err: LoadError) -> ApiError {
    let reason = err.to_string();
    log_event_with_fields(
        Event::DatasetRejected,
        &[("filename", filename), ("reason", reason.as_str())],
    );
    ApiError::Dataset(err)
}
