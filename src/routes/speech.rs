//! Text-to-speech and transcription routes.
//!
//! Text-to-speech reports every failure, bad input included, as 500 with an
//! `{ error }` body; transcription separates bad input (400) from upstream
//! failure (500).

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use super::{ApiError, json_body};
use crate::services::speech::{self, SpeechError, SpeechRequest, SpeechResponse, TranscribeRequest, TranscribeResponse};
use crate::state::AppState;

/// `POST /api/text-to-speech`: synthesize MP3 audio, returned as base64.
pub async fn text_to_speech(
    State(state): State<AppState>,
    body: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Json<SpeechResponse>, ApiError> {
    let request = json_body(body).map_err(|e| ApiError::internal(e.message))?;
    let response = speech::synthesize(state.audio.as_ref(), request)
        .await
        .map_err(|e| {
            log_speech_error(&e);
            ApiError::internal(e.to_string())
        })?;
    Ok(Json(response))
}

/// `POST /api/transcribe`: transcribe a base64 voice clip.
pub async fn transcribe(
    State(state): State<AppState>,
    body: Result<Json<TranscribeRequest>, JsonRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let request = json_body(body)?;
    let response = speech::transcribe(state.audio.as_ref(), request)
        .await
        .map_err(transcribe_error_to_api)?;
    Ok(Json(response))
}

pub(crate) fn transcribe_error_to_api(err: SpeechError) -> ApiError {
    log_speech_error(&err);
    match err {
        SpeechError::MissingAudio | SpeechError::InvalidAudio(_) => ApiError::bad_request(err.to_string()),
        SpeechError::Llm(_) => ApiError::internal("failed to transcribe audio"),
        _ => ApiError::internal(err.to_string()),
    }
}

fn log_speech_error(err: &SpeechError) {
    match err {
        SpeechError::Llm(e) => tracing::warn!(error = %e, code = e.error_code(), "speech: upstream failure"),
        SpeechError::NotConfigured => tracing::error!("speech: audio client not configured"),
        other => tracing::info!(error = %other, "speech: rejected request"),
    }
}

#[cfg(test)]
#[path = "speech_test.rs"]
mod tests;
