use axum::extract::{Path, State};
use axum::http::StatusCode;
use ticketsense_application::RecordNamespace;
use ticketsense_core::TicketId;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn evict_cache_entry_handler(
    State(state): State<AppState>,
    Path((feature, ticket_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let namespace = feature.parse::<RecordNamespace>()?;
    let ticket_id = TicketId::new(ticket_id)?;

    let removed = state.insight_service.evict(namespace, &ticket_id).await?;
    info!(
        ticket_id = %ticket_id,
        namespace = namespace.as_str(),
        removed,
        "cache entry evicted"
    );

    Ok(StatusCode::NO_CONTENT)
}
