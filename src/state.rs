//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the external-service seams: the AI clients, object storage and the
//! video record store. AI and storage are optional so the server can boot
//! with those features disabled when their credentials are absent.

use std::path::PathBuf;
use std::sync::Arc;

use crate::llm::{AudioApi, LlmChat};
use crate::services::video::VideoStore;
use crate::storage::ObjectStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    /// Chat client for fact-check verdicts. `None` if `OPENAI_API_KEY` is unset.
    pub llm: Option<Arc<dyn LlmChat>>,
    /// Speech and transcription client. `None` if `OPENAI_API_KEY` is unset.
    pub audio: Option<Arc<dyn AudioApi>>,
    /// Video bucket. `None` if storage credentials are unset.
    pub storage: Option<Arc<dyn ObjectStore>>,
    pub videos: Arc<dyn VideoStore>,
    /// Directory holding the prerendered site.
    pub static_dir: PathBuf,
    pub fact_check_max_tokens: u32,
}

impl AppState {
    #[must_use]
    pub fn new(videos: Arc<dyn VideoStore>, static_dir: PathBuf) -> Self {
        Self {
            llm: None,
            audio: None,
            storage: None,
            videos,
            static_dir,
            fact_check_max_tokens: crate::config::DEFAULT_FACT_CHECK_MAX_TOKENS,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
