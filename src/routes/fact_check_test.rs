use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{Value, json};

use super::*;
use crate::llm::types::LlmError;
use crate::state::test_helpers::{MockLlm, test_app_state};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn body(value: Value) -> Result<Json<FactCheckRequest>, JsonRejection> {
    Ok(Json(serde_json::from_value(value).unwrap()))
}

#[tokio::test]
async fn fact_check_returns_verdict_shape() {
    let mut state = test_app_state();
    state.llm = Some(Arc::new(MockLlm::replying(
        r#"{"isTrue":false,"explanation":"Stubble burning depletes soil carbon.","source":"ICAR"}"#,
    )));

    let response = fact_check(State(state), body(json!({ "query": "Burning stubble fertilizes soil", "language": "en" })))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["isTrue"], false);
    assert_eq!(json["explanation"], "Stubble burning depletes soil carbon.");
    assert_eq!(json["source"], "ICAR");
}

#[tokio::test]
async fn fact_check_empty_query_is_400() {
    let mut state = test_app_state();
    state.llm = Some(Arc::new(MockLlm::replying("{}")));

    let response = fact_check(State(state), body(json!({ "query": "" }))).await.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "query is required");
}

#[tokio::test]
async fn fact_check_missing_query_is_400() {
    let response = fact_check(State(test_app_state()), body(json!({ "language": "hi" })))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fact_check_upstream_failure_is_500() {
    let mut state = test_app_state();
    state.llm = Some(Arc::new(MockLlm::failing()));

    let response = fact_check(State(state), body(json!({ "query": "claim" }))).await.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn fact_check_without_llm_is_500() {
    let response = fact_check(State(test_app_state()), body(json!({ "query": "claim" })))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn error_mapping_hides_upstream_body() {
    let err = FactCheckError::Llm(LlmError::ApiResponse { status: 401, body: "invalid key sk-123".into() });
    let api = fact_check_error_to_api(err);
    assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!api.message.contains("sk-123"));
}

#[test]
fn error_mapping_query_too_long_is_400() {
    assert_eq!(fact_check_error_to_api(FactCheckError::QueryTooLong).status, StatusCode::BAD_REQUEST);
}
