//! LLM: `OpenAI` adapter for fact-checking, speech and transcription.
//!
//! DESIGN
//! ======
//! `LlmClient` wraps the HTTP client with the configured model names and
//! implements both [`LlmChat`] and [`AudioApi`], so the app state can hold
//! one shared client behind two trait objects.

pub mod config;
pub mod openai;
pub mod types;

use config::LlmConfig;
pub use types::{AudioApi, LlmChat};
use types::{AudioClip, ChatResponse, LlmError, Message, ResponseFormat, Voice};

/// Concrete client configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
    tts_model: String,
    transcription_model: String,
}

impl LlmClient {
    /// Build a client from environment variables. See [`LlmConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    /// Build a client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = openai::OpenAiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self {
            inner,
            model: config.model,
            tts_model: config.tts_model,
            transcription_model: config.transcription_model,
        })
    }

    /// Return the configured chat model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(
        &self,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
        format: ResponseFormat,
    ) -> Result<ChatResponse, LlmError> {
        self.inner
            .chat(&self.model, max_tokens, system, messages, format)
            .await
    }
}

#[async_trait::async_trait]
impl AudioApi for LlmClient {
    async fn speech(&self, text: &str, voice: Voice) -> Result<Vec<u8>, LlmError> {
        self.inner.speech(&self.tts_model, text, voice).await
    }

    async fn transcribe(&self, clip: AudioClip) -> Result<String, LlmError> {
        self.inner
            .transcribe(&self.transcription_model, clip)
            .await
    }
}
