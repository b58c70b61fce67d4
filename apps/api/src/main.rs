//! Ticketsense API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod check_config;
mod dto;
mod error;
mod handlers;
mod middleware;
mod origin_policy;
mod state;


use std::env;

use ticketsense_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    if env::args().nth(1).as_deref() == Some("check-config") {
        check_config::run();
        return Ok(());
    }

    let config = ApiConfig::load()?;
    let app_state = api_services::build_app_state(&config).await?;
    let app = api_router::build_router(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "ticketsense-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
