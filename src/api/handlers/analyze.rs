use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::{error, warn};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{AnalyzeBody, AnalyzeResponse};

const GENERIC_FAILURE: &str = "Error analyzing options.";

pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        warn!(error = %rejection, "rejected analyze body");
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let request = body.into_request(&state.defaults);
    state.analyzer.check(&request)?;

    // Run on its own task so a panic in the pipeline becomes a 500 instead of
    // a dropped connection. Partial results die with the task.
    let analyzer = state.analyzer.clone();
    let outcome = tokio::spawn(async move { analyzer.analyze(&request).await })
        .await
        .map_err(|e| {
            error!(error = %e, "analysis task failed");
            ApiError::Internal(GENERIC_FAILURE.to_string())
        })?;

    let results = outcome?;
    Ok(Json(AnalyzeResponse { results }))
}
