//! Fact-check route.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use super::{ApiError, json_body};
use crate::services::fact_check::{self, FactCheckError, FactCheckRequest, Verdict};
use crate::state::AppState;

/// `POST /api/fact-check`: judge an agricultural claim.
pub async fn fact_check(
    State(state): State<AppState>,
    body: Result<Json<FactCheckRequest>, JsonRejection>,
) -> Result<Json<Verdict>, ApiError> {
    let request = json_body(body)?;
    let verdict = fact_check::check(state.llm.as_ref(), state.fact_check_max_tokens, request)
        .await
        .map_err(fact_check_error_to_api)?;
    Ok(Json(verdict))
}

pub(crate) fn fact_check_error_to_api(err: FactCheckError) -> ApiError {
    match err {
        FactCheckError::EmptyQuery | FactCheckError::QueryTooLong => ApiError::bad_request(err.to_string()),
        FactCheckError::NotConfigured => {
            tracing::error!("fact-check: LLM client not configured");
            ApiError::internal(err.to_string())
        }
        FactCheckError::Llm(ref e) => {
            tracing::warn!(error = %e, code = e.error_code(), "fact-check: upstream failure");
            ApiError::internal("failed to check the claim")
        }
    }
}

#[cfg(test)]
#[path = "fact_check_test.rs"]
mod tests;
