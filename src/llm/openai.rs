//! OpenAI API client.
//!
//! Covers the three endpoints the app proxies: `/chat/completions` for
//! fact-check verdicts, `/audio/speech` for text-to-speech and
//! `/audio/transcriptions` for voice queries.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::config::LlmTimeouts;
use super::types::{AudioClip, ChatResponse, LlmError, Message, ResponseFormat, Voice};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client against `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
        format: ResponseFormat,
    ) -> Result<ChatResponse, LlmError> {
        let msgs = build_chat_completions_messages(system, messages);
        let body = CcRequest {
            model,
            max_tokens,
            messages: &msgs,
            response_format: match format {
                ResponseFormat::Text => None,
                ResponseFormat::JsonObject => Some(CcResponseFormat { format_type: "json_object" }),
            },
        };
        let response = self.post(&format!("{}/chat/completions", self.base_url)).json(&body).send().await;
        let text = read_text(response).await?;
        parse_chat_completions_response(&text)
    }

    pub async fn speech(&self, model: &str, text: &str, voice: Voice) -> Result<Vec<u8>, LlmError> {
        let body = SpeechRequest { model, input: text, voice: voice.as_str(), response_format: "mp3" };
        let response = self
            .post(&format!("{}/audio/speech", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiResponse { status, body });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    pub async fn transcribe(&self, model: &str, clip: AudioClip) -> Result<String, LlmError> {
        let file_name = format!("audio.{}", audio_extension(&clip.mime_type));
        let part = reqwest::multipart::Part::bytes(clip.bytes)
            .file_name(file_name)
            .mime_str(&clip.mime_type)
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        let mut form = reqwest::multipart::Form::new()
            .text("model", model.to_string())
            .part("file", part);
        if let Some(language) = clip.language {
            form = form.text("language", language);
        }

        let response = self
            .post(&format!("{}/audio/transcriptions", self.base_url))
            .multipart(form)
            .send()
            .await;
        let text = read_text(response).await?;
        parse_transcription_response(&text)
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.post(url).bearer_auth(&self.api_key)
    }
}

async fn read_text(response: Result<reqwest::Response, reqwest::Error>) -> Result<String, LlmError> {
    let response = response.map_err(|e| LlmError::ApiRequest(e.to_string()))?;
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
    if status != 200 {
        return Err(LlmError::ApiResponse { status, body: text });
    }
    Ok(text)
}

/// File extension the transcription endpoint uses to sniff the container.
pub(crate) fn audio_extension(mime_type: &str) -> &'static str {
    let base = mime_type.split(';').next().unwrap_or_default().trim();
    match base {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        _ => "webm",
    }
}

// =============================================================================
// CHAT COMPLETIONS: wire types
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage<'a>],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<CcResponseFormat>,
}

#[derive(Serialize)]
struct CcResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub(crate) struct CcMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

pub(crate) fn build_chat_completions_messages<'a>(system: &'a str, messages: &'a [Message]) -> Vec<CcMessage<'a>> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if !system.trim().is_empty() {
        out.push(CcMessage { role: "system", content: system });
    }
    out.extend(messages.iter().map(|m| CcMessage { role: &m.role, content: &m.content }));
    out
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();
    let usage = root.get("usage");
    let input_tokens = usage
        .and_then(|u| u.get("prompt_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let output_tokens = usage
        .and_then(|u| u.get("completion_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };
    let stop_reason = match choice.get("finish_reason").and_then(Value::as_str) {
        Some("length") => "max_tokens",
        Some("content_filter") => "content_filter",
        _ => "end_turn",
    }
    .to_string();
    let text = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ChatResponse { text, model, stop_reason, input_tokens, output_tokens })
}

pub(crate) fn parse_transcription_response(json_text: &str) -> Result<String, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    root.get("text")
        .and_then(Value::as_str)
        .map(|t| t.trim().to_string())
        .ok_or_else(|| LlmError::ApiParse("transcription: missing text".to_string()))
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
