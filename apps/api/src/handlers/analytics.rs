use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use ticketsense_application::FlaggedEvaluations;

use crate::dto::FlaggedEvaluationsResponse;
use crate::state::AppState;

pub async fn flagged_evaluations_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<FlaggedEvaluationsResponse>) {
    match state.analytics_service.list_flagged().await {
        FlaggedEvaluations::Available(items) => (
            StatusCode::OK,
            Json(FlaggedEvaluationsResponse::available(items)),
        ),
        FlaggedEvaluations::CacheUnavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(FlaggedEvaluationsResponse::cache_unavailable()),
        ),
    }
}
