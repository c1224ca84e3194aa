//! API route handlers

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::Path;

use askdoc_core::{Error, IndexStats};

use crate::state::AppState;

pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/query", post(query))
        .route("/stats", get(stats))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Service error wrapped for HTTP responses
///
/// Invalid input maps to 400 with its message; everything else is logged and
/// surfaced as a generic 500. No retry or recovery happens here — a failed
/// request is terminal and the caller re-submits.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self.0);

        let (status, message) = match &self.0 {
            Error::InvalidInput(message) => (StatusCode::BAD_REQUEST, message.clone()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "request failed, see server logs".to_string(),
            ),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct UploadResponse {
    message: String,
    source_file: String,
    pages: usize,
    chunks_indexed: usize,
}

/// POST /api/upload - accept a PDF file and run it through the pipeline
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidInput(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(sanitize_file_name)
            .transpose()?
            .ok_or_else(|| Error::InvalidInput("no file selected".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidInput(format!("failed to read upload: {}", e)))?;

        upload = Some((file_name, data));
        break;
    }

    let Some((file_name, data)) = upload else {
        return Err(Error::InvalidInput("no file part in request".to_string()).into());
    };

    if !file_name.to_lowercase().ends_with(".pdf") {
        return Err(
            Error::InvalidInput("invalid file type, please upload a PDF file".to_string()).into(),
        );
    }

    let path = state.upload_dir.join(&file_name);
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| Error::Storage(format!("failed to store upload {}: {}", path.display(), e)))?;

    let report = state.service.ingest_file(&path).await?;
    tracing::info!(
        source_file = %report.source_file,
        chunks = report.chunks_indexed,
        "processed uploaded document"
    );

    Ok(Json(UploadResponse {
        message: "File processed successfully".to_string(),
        source_file: report.source_file,
        pages: report.pages,
        chunks_indexed: report.chunks_indexed,
    }))
}

#[derive(Deserialize)]
struct QueryRequest {
    query: String,
}

#[derive(Serialize)]
struct QueryResponse {
    response: String,
}

/// POST /api/query - answer a natural-language question
async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let answer = state.service.answer(&request.query).await?;
    Ok(Json(QueryResponse { response: answer }))
}

/// GET /api/stats - index statistics
async fn stats(State(state): State<AppState>) -> Result<Json<IndexStats>, ApiError> {
    Ok(Json(state.service.stats().await?))
}

/// Reduce an uploaded file name to a safe basename
fn sanitize_file_name(raw: &str) -> Result<String, Error> {
    let name = Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    if name.is_empty() || name.starts_with('.') {
        return Err(Error::InvalidInput(format!("unusable file name '{}'", raw)));
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directory_components() {
        assert_eq!(sanitize_file_name("report.pdf").unwrap(), "report.pdf");
        assert_eq!(
            sanitize_file_name("../../etc/passwd.pdf").unwrap(),
            "passwd.pdf"
        );
        assert_eq!(
            sanitize_file_name("/tmp/upload/report.pdf").unwrap(),
            "report.pdf"
        );
    }

    #[test]
    fn sanitize_rejects_empty_and_hidden_names() {
        assert!(sanitize_file_name("").is_err());
        assert!(sanitize_file_name("..").is_err());
        assert!(sanitize_file_name(".hidden.pdf").is_err());
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let response = ApiError(Error::InvalidInput("nope".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError(Error::Storage("disk gone".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
