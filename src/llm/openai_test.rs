use super::*;

// ===== chat completions =====

#[test]
fn cc_parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "{\"isTrue\":false}" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.text, "{\"isTrue\":false}");
    assert_eq!(resp.model, "gpt-4o-mini");
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn cc_parse_length_finish_reason() {
    let json = serde_json::json!({
        "model": "gpt-4o-mini",
        "choices": [{ "message": { "content": "partial" }, "finish_reason": "length" }]
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.stop_reason, "max_tokens");
    assert_eq!(resp.input_tokens, 0);
}

#[test]
fn cc_parse_null_content_is_empty_text() {
    let json = serde_json::json!({
        "model": "gpt-4o-mini",
        "choices": [{ "message": { "content": null }, "finish_reason": "stop" }]
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert!(resp.text.is_empty());
}

#[test]
fn cc_parse_missing_choices() {
    let json = serde_json::json!({ "model": "gpt-4o", "choices": [] }).to_string();
    assert!(matches!(parse_chat_completions_response(&json), Err(LlmError::ApiParse(_))));
}

#[test]
fn cc_parse_invalid_json() {
    assert!(parse_chat_completions_response("not json").is_err());
}

#[test]
fn cc_messages_prepend_system() {
    let messages = vec![Message::user("claim")];
    let out = build_chat_completions_messages("be factual", &messages);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], CcMessage { role: "system", content: "be factual" });
    assert_eq!(out[1], CcMessage { role: "user", content: "claim" });
}

#[test]
fn cc_messages_skip_blank_system() {
    let messages = vec![Message::user("claim")];
    let out = build_chat_completions_messages("  ", &messages);
    assert_eq!(out.len(), 1);
}

// ===== transcription =====

#[test]
fn transcription_parse_trims_text() {
    let json = serde_json::json!({ "text": "  does urea burn roots?\n" }).to_string();
    assert_eq!(parse_transcription_response(&json).unwrap(), "does urea burn roots?");
}

#[test]
fn transcription_parse_missing_text() {
    let json = serde_json::json!({ "language": "en" }).to_string();
    assert!(parse_transcription_response(&json).is_err());
}

#[test]
fn audio_extension_maps_known_types() {
    assert_eq!(audio_extension("audio/mpeg"), "mp3");
    assert_eq!(audio_extension("audio/wav"), "wav");
    assert_eq!(audio_extension("audio/webm;codecs=opus"), "webm");
    assert_eq!(audio_extension("audio/mp4"), "m4a");
}

#[test]
fn audio_extension_defaults_to_webm() {
    assert_eq!(audio_extension("application/octet-stream"), "webm");
    assert_eq!(audio_extension(""), "webm");
}
