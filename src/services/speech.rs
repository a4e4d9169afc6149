//! Speech service: text-to-speech for verdicts and transcription of voice
//! queries. Audio crosses the HTTP boundary as base64.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::llm::AudioApi;
use crate::llm::types::{AudioClip, LlmError, Voice};

/// Upstream limit on characters per speech request.
pub const MAX_SPEECH_CHARS: usize = 4096;
const DEFAULT_AUDIO_MIME: &str = "audio/webm";

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("text is required")]
    MissingText,
    #[error("text exceeds {} characters", MAX_SPEECH_CHARS)]
    TextTooLong,
    #[error("unsupported voice: {0}")]
    UnknownVoice(String),
    #[error("audio is required")]
    MissingAudio,
    #[error("audio is not valid base64: {0}")]
    InvalidAudio(String),
    #[error("speech services are not configured")]
    NotConfigured,
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

// =============================================================================
// TEXT TO SPEECH
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeechRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    pub audio_content: String,
}

/// Synthesize speech and return it base64-encoded.
///
/// # Errors
///
/// Returns a validation error for missing/oversized text or an unknown
/// voice, [`SpeechError::NotConfigured`] without a client, and
/// [`SpeechError::Llm`] when synthesis fails.
pub async fn synthesize(audio: Option<&Arc<dyn AudioApi>>, request: SpeechRequest) -> Result<SpeechResponse, SpeechError> {
    let text = request.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(SpeechError::MissingText);
    }
    if text.chars().count() > MAX_SPEECH_CHARS {
        return Err(SpeechError::TextTooLong);
    }
    let voice = match request.voice.as_deref().filter(|v| !v.trim().is_empty()) {
        None => Voice::default(),
        Some(raw) => Voice::parse(raw).ok_or_else(|| SpeechError::UnknownVoice(raw.to_string()))?,
    };
    let audio = audio.ok_or(SpeechError::NotConfigured)?;

    let mp3 = audio.speech(text, voice).await?;
    info!(chars = text.len(), voice = voice.as_str(), bytes = mp3.len(), "speech: synthesized");
    Ok(SpeechResponse { audio_content: BASE64.encode(mp3) })
}

// =============================================================================
// TRANSCRIPTION
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    pub audio: Option<String>,
    pub mime_type: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Decode a base64 clip, accepting an optional `data:` URL prefix.
pub(crate) fn decode_audio(raw: &str) -> Result<Vec<u8>, SpeechError> {
    let payload = match raw.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => raw,
    };
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(cleaned.as_bytes())
        .map_err(|e| SpeechError::InvalidAudio(e.to_string()))?;
    if bytes.is_empty() {
        return Err(SpeechError::MissingAudio);
    }
    Ok(bytes)
}

/// Transcribe a base64-encoded voice clip.
///
/// # Errors
///
/// Returns [`SpeechError::MissingAudio`] or [`SpeechError::InvalidAudio`]
/// for bad input, [`SpeechError::NotConfigured`] without a client, and
/// [`SpeechError::Llm`] when transcription fails.
pub async fn transcribe(
    audio: Option<&Arc<dyn AudioApi>>,
    request: TranscribeRequest,
) -> Result<TranscribeResponse, SpeechError> {
    let raw = request
        .audio
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(SpeechError::MissingAudio)?;
    let bytes = decode_audio(raw)?;
    let audio = audio.ok_or(SpeechError::NotConfigured)?;

    let mime_type = request
        .mime_type
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string());
    let language = request.language.filter(|l| !l.trim().is_empty());
    let size = bytes.len();

    let text = audio
        .transcribe(AudioClip { bytes, mime_type, language })
        .await?;
    info!(bytes = size, chars = text.len(), "speech: transcribed");
    Ok(TranscribeResponse { text })
}

#[cfg(test)]
#[path = "speech_test.rs"]
mod tests;
