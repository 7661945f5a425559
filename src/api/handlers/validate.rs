use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use crate::api::state::AppState;
use crate::api::types::ValidateQuery;
use crate::validator::{self, TickerValidation};

pub async fn validate_ticker(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
) -> (StatusCode, Json<TickerValidation>) {
    let ticker = query.ticker.unwrap_or_default();
    if ticker.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(TickerValidation::invalid("No ticker provided")),
        );
    }

    let outcome = validator::validate_ticker(state.provider.as_ref(), &ticker).await;
    (StatusCode::OK, Json(outcome))
}
