//! Fact-check service: agricultural claim → verdict.
//!
//! DESIGN
//! ======
//! The claim is sent to the chat model with a system prompt that pins the
//! reply to a JSON object `{isTrue, explanation, source}` written in the
//! requested language. Replies are parsed leniently: fenced JSON is
//! unwrapped, string booleans are coerced, and a reply that is not JSON at
//! all becomes an inconclusive verdict carrying the raw text.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message, ResponseFormat};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const MAX_QUERY_CHARS: usize = 2000;

const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("mr", "Marathi"),
    ("bn", "Bengali"),
    ("kn", "Kannada"),
    ("gu", "Gujarati"),
    ("pa", "Punjabi"),
    ("ml", "Malayalam"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("sw", "Swahili"),
];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FactCheckError {
    #[error("query is required")]
    EmptyQuery,
    #[error("query exceeds {} characters", MAX_QUERY_CHARS)]
    QueryTooLong,
    #[error("fact-checking is not configured")]
    NotConfigured,
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FactCheckRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Verdict returned to the client. `is_true` is `None` when the model could
/// not reach a conclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_true: Option<bool>,
    pub explanation: String,
    pub source: String,
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Check one claim.
///
/// # Errors
///
/// Returns [`FactCheckError::EmptyQuery`] or [`FactCheckError::QueryTooLong`]
/// for bad input, [`FactCheckError::NotConfigured`] without an LLM client,
/// and [`FactCheckError::Llm`] when the upstream call fails.
pub async fn check(
    llm: Option<&Arc<dyn LlmChat>>,
    max_tokens: u32,
    request: FactCheckRequest,
) -> Result<Verdict, FactCheckError> {
    let query = request.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(FactCheckError::EmptyQuery);
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(FactCheckError::QueryTooLong);
    }
    let llm = llm.ok_or(FactCheckError::NotConfigured)?;

    let language = request
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE);
    let system = build_system_prompt(language_name(language));

    info!(query_len = query.len(), %language, "fact-check: query received");
    let response = llm
        .chat(max_tokens, &system, &[Message::user(query)], ResponseFormat::JsonObject)
        .await?;
    if response.stop_reason == "max_tokens" {
        warn!(output_tokens = response.output_tokens, "fact-check: reply truncated");
    }

    let verdict = parse_verdict(&response.text);
    info!(
        is_true = ?verdict.is_true,
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "fact-check: verdict ready"
    );
    Ok(verdict)
}

// =============================================================================
// PROMPT
// =============================================================================

/// Display name for a language code; unknown codes pass through verbatim.
#[must_use]
pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map_or(code, |&(_, name)| name)
}

pub(crate) fn build_system_prompt(language: &str) -> String {
    format!(
        "You are an agricultural fact-checker helping farmers identify misinformation about \
crops, soil, fertilizers, pesticides, livestock, irrigation, weather and farm policy.\n\
Assess the user's claim against established agronomic science and official agricultural \
guidance. Reply with a single JSON object and nothing else:\n\
{{\"isTrue\": true | false | null, \"explanation\": string, \"source\": string}}\n\
- isTrue is true if the claim is accurate, false if it is misinformation, and null if the \
evidence is mixed or the claim is not about agriculture.\n\
- explanation is two to four plain sentences a farmer can act on.\n\
- source names a credible reference such as an agricultural university, extension service, \
FAO or a national agriculture ministry.\n\
Write explanation and source in {language}."
    )
}

// =============================================================================
// REPLY PARSING
// =============================================================================

/// Parse a model reply into a verdict. Never fails.
#[must_use]
pub fn parse_verdict(reply: &str) -> Verdict {
    let body = strip_code_fence(reply.trim());
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) else {
        return Verdict { is_true: None, explanation: reply.trim().to_string(), source: String::new() };
    };

    let is_true = match obj.get("isTrue").or_else(|| obj.get("is_true")) {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    };
    let text_field = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    Verdict { is_true, explanation: text_field("explanation"), source: text_field("source") }
}

/// Body of the first fenced block in `text`, or `text` when there is none.
/// The opening line's info string (`json`, `JSON`, ...) is skipped.
fn strip_code_fence(text: &str) -> &str {
    const FENCE: &str = "```";
    let Some(open) = text.find(FENCE) else {
        return text;
    };
    let after_open = &text[open + FENCE.len()..];
    let body = match after_open.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with('{') => body,
        _ => after_open,
    };
    let body = body.find(FENCE).map_or(body, |close| &body[..close]);
    body.trim()
}

#[cfg(test)]
#[path = "fact_check_test.rs"]
mod tests;
