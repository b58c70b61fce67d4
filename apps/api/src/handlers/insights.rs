use axum::Json;
use axum::extract::State;
use ticketsense_domain::{EvaluationRecord, SummaryRecord};

use crate::dto::TicketRequest;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn summary_handler(
    State(state): State<AppState>,
    Json(payload): Json<TicketRequest>,
) -> ApiResult<Json<SummaryRecord>> {
    let ticket_id = payload.ticket_id()?;
    let record = state.insight_service.summarize(&ticket_id).await?;

    Ok(Json(record))
}

pub async fn evaluate_handler(
    State(state): State<AppState>,
    Json(payload): Json<TicketRequest>,
) -> ApiResult<Json<EvaluationRecord>> {
    let ticket_id = payload.ticket_id()?;
    let record = state.insight_service.evaluate(&ticket_id).await?;

    Ok(Json(record))
}
