use axum::Json;
use axum::extract::State;

use crate::dto::HealthResponse;
use crate::state::AppState;

mod checks;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = checks::check_cache(&state.cache_probe).await;
    let status = if cache.status == "error" {
        "degraded"
    } else {
        "ok"
    };

    Json(HealthResponse { status, cache })
}
