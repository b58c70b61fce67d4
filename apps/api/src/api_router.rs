use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/summary", post(handlers::insights::summary_handler))
        .route("/evaluate", post(handlers::insights::evaluate_handler))
        .route(
            "/analytics/flagged",
            get(handlers::analytics::flagged_evaluations_handler),
        )
        .route(
            "/cache/{feature}/{ticket_id}",
            delete(handlers::cache::evict_cache_entry_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_basic_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::reject_foreign_origins,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(app_state.origin_policy.clone()))
        .with_state(app_state)
}
