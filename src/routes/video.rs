//! Video routes: range-aware streaming proxy, provider webhook and record
//! lookup.

use axum::Json;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::{self, HeaderMap};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{ApiError, json_body};
use crate::services::video::{self, NewVideo, VideoError, VideoRecord, WebhookPayload};
use crate::services::video_stream::{self, RangeOutcome};
use crate::state::AppState;
use crate::storage::StorageError;

#[derive(Debug, Default, Deserialize)]
pub struct ProxyParams {
    pub path: Option<String>,
}

// =============================================================================
// STREAMING PROXY
// =============================================================================

/// `GET /api/video-proxy?path=...`: stream an object from the video bucket,
/// honoring single byte-range requests.
pub async fn video_proxy(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let path = params
        .path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("path is required"))?;
    if !video_stream::is_valid_object_path(path) {
        return Err(ApiError::bad_request("invalid path"));
    }
    let path = path.trim_start_matches('/');

    let storage = state.storage.as_ref().ok_or_else(|| {
        tracing::error!("video-proxy: storage not configured");
        ApiError::internal("storage is not configured")
    })?;
    let object = storage.download(path).await.map_err(storage_error_to_api)?;

    let size = object.bytes.len() as u64;
    let content_type = video_stream::content_type_for(path, object.content_type.as_deref());
    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());

    let response = match video_stream::parse_range(range, size) {
        RangeOutcome::Full => {
            tracing::debug!(%path, size, "video-proxy: full body");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_LENGTH, size.to_string()),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                Body::from(object.bytes),
            )
                .into_response()
        }
        RangeOutcome::Partial { start, end } => {
            tracing::debug!(%path, start, end, size, "video-proxy: partial body");
            #[allow(clippy::cast_possible_truncation)]
            let slice = object.bytes.slice(start as usize..=end as usize);
            (
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_LENGTH, slice.len().to_string()),
                    (header::CONTENT_RANGE, video_stream::content_range(start, end, size)),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                Body::from(slice),
            )
                .into_response()
        }
        RangeOutcome::Unsatisfiable => (
            StatusCode::RANGE_NOT_SATISFIABLE,
            [(header::CONTENT_RANGE, format!("bytes */{size}"))],
            Body::empty(),
        )
            .into_response(),
    };
    Ok(response)
}

pub(crate) fn storage_error_to_api(err: StorageError) -> ApiError {
    match err {
        StorageError::NotFound(path) => {
            tracing::info!(%path, "video-proxy: object not found");
            ApiError::not_found("video not found")
        }
        other => {
            tracing::warn!(error = %other, "video-proxy: storage failure");
            ApiError::internal("failed to fetch video")
        }
    }
}

// =============================================================================
// WEBHOOK + RECORDS
// =============================================================================

/// `POST /api/video-webhook`: provider status callback.
pub async fn video_webhook(
    State(state): State<AppState>,
    body: Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let payload = json_body(body)?;
    let record = video::apply_webhook(state.videos.as_ref(), payload)
        .await
        .map_err(video_error_to_api)?;
    Ok(Json(json!({ "success": true, "id": record.id })))
}

/// `POST /api/videos`: register a generation record.
pub async fn create_video(
    State(state): State<AppState>,
    body: Result<Json<NewVideo>, JsonRejection>,
) -> Result<(StatusCode, Json<VideoRecord>), ApiError> {
    let body = json_body(body)?;
    let record = video::register(state.videos.as_ref(), body)
        .await
        .map_err(video_error_to_api)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/videos/:id`: fetch one record.
pub async fn get_video(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<VideoRecord>, ApiError> {
    state
        .videos
        .get(id)
        .await
        .map_err(video_error_to_api)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("video not found"))
}

pub(crate) fn video_error_to_api(err: VideoError) -> ApiError {
    match err {
        VideoError::MissingField(_) | VideoError::InvalidField { .. } => ApiError::bad_request(err.to_string()),
        VideoError::ProjectNotFound(_) | VideoError::NotFound(_) => ApiError::not_found(err.to_string()),
        VideoError::Duplicate(_) => ApiError::new(StatusCode::CONFLICT, err.to_string()),
        VideoError::Database(ref e) => {
            tracing::error!(error = %e, "video: database failure");
            ApiError::internal("failed to update video record")
        }
    }
}

#[cfg(test)]
#[path = "video_test.rs"]
mod tests;
