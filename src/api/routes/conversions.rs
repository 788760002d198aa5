//! Conversion task handlers: submit, poll, list, cancel, artifact download.

use crate::api::AppState;
use crate::error::{ApiError, ToHttpStatus};
use crate::types::TaskId;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Map a domain error onto its HTTP status and the stable JSON error envelope.
fn error_response(error: crate::Error) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiError::from(error))).into_response()
}

/// GET /conversions - List all conversion tasks
#[utoipa::path(
    get,
    path = "/api/v1/conversions",
    tag = "conversions",
    responses(
        (status = 200, description = "List of all tracked conversions, newest first", body = Vec<crate::types::ConversionStatus>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_conversions(State(state): State<AppState>) -> impl IntoResponse {
    let conversions = state.converter.list().await;
    (StatusCode::OK, Json(conversions))
}

/// GET /conversions/:id - Poll a single conversion
#[utoipa::path(
    get,
    path = "/api/v1/conversions/{id}",
    tag = "conversions",
    params(
        ("id" = String, Path, description = "Conversion task ID")
    ),
    responses(
        (status = 200, description = "Current conversion status", body = crate::types::ConversionStatus),
        (status = 404, description = "Conversion not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_conversion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.converter.status(&TaskId(id)).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /conversions - Submit a document for conversion
#[utoipa::path(
    post,
    path = "/api/v1/conversions",
    tag = "conversions",
    request_body(content = Vec<u8>, description = "Document upload in the 'file' field (multipart/form-data)", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Conversion accepted, returns the task ID"),
        (status = 400, description = "Malformed upload"),
        (status = 422, description = "Validation failure (empty, oversized, or unsupported file)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_conversion(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut file_content: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        if name.as_str() == "file" {
            if let Some(filename) = field.file_name() {
                file_name = Some(filename.to_string());
            }
            match field.bytes().await {
                Ok(bytes) => file_content = Some(bytes.to_vec()),
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": {"code": "invalid_file", "message": format!("Failed to read file: {}", e)}})),
                    )
                        .into_response();
                }
            }
        }
    }

    let content = match file_content {
        Some(bytes) => bytes,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"code": "missing_file", "message": "No document provided in 'file' field"}})),
            )
                .into_response();
        }
    };

    let filename = file_name.unwrap_or_default();

    match state.converter.submit(&filename, &content).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({"id": id}))).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /conversions/:id/cancel - Request cancellation
///
/// Cancellation is cooperative: this endpoint only sets the cancel flag. The
/// pipeline observes it at its next checkpoint and winds the task down.
#[utoipa::path(
    post,
    path = "/api/v1/conversions/{id}/cancel",
    tag = "conversions",
    params(
        ("id" = String, Path, description = "Conversion task ID")
    ),
    responses(
        (status = 202, description = "Cancellation requested (no-op if already terminal)"),
        (status = 404, description = "Conversion not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn cancel_conversion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = TaskId(id);
    match state.converter.cancel(&id).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(json!({"id": id, "status": "cancellation requested"})),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /conversions/:id/artifact - Download the produced audio file
#[utoipa::path(
    get,
    path = "/api/v1/conversions/{id}/artifact",
    tag = "conversions",
    params(
        ("id" = String, Path, description = "Conversion task ID")
    ),
    responses(
        (status = 200, description = "The produced WAV file", content_type = "audio/wav"),
        (status = 404, description = "Conversion not found"),
        (status = 409, description = "Conversion has no artifact (failed, cancelled, or still running)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn download_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let path = match state.converter.artifact_path(&TaskId(id)).await {
        Ok(path) => path,
        Err(e) => return error_response(e),
    };

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Registry record survived the artifact file (e.g. external cleanup)
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"code": "not_found", "message": "Artifact file no longer exists on disk"}})),
            )
                .into_response();
        }
        Err(e) => return error_response(crate::Error::Io(e)),
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.wav".to_string());

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}
