//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API endpoints and serves the prerendered site
//! from `AppState::static_dir`. Paths that are not API routes or files fall
//! back to the unrendered template shell (or `index.html` before the first
//! prerender) so the SPA router can take over.

pub mod fact_check;
pub mod speech;
pub mod video;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::prerender;
use crate::state::AppState;

// =============================================================================
// ERROR PAYLOAD
// =============================================================================

/// JSON error response: `{ "error": message }` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Unwrap a JSON body, turning a rejection into a 400 error payload.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "rejected request body");
        ApiError::bad_request(rejection.body_text())
    })
}

// =============================================================================
// ROUTER
// =============================================================================

/// JSON API routes.
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/fact-check", post(fact_check::fact_check))
        .route("/api/text-to-speech", post(speech::text_to_speech))
        .route("/api/transcribe", post(speech::transcribe))
        .route("/api/video-proxy", get(video::video_proxy))
        .route("/api/video-webhook", post(video::video_webhook))
        .route("/api/videos", post(video::create_video))
        .route("/api/videos/{id}", get(video::get_video))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Full application: API routes plus the prerendered site.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let shell = prerender::default_template(&state.static_dir);
    let site = ServeDir::new(&state.static_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(shell));

    api_routes(state)
        .fallback_service(site)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
