use std::time::Duration;

use ticketsense_core::AppError;

pub fn build_http_client(timeout_seconds: u64, purpose: &str) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.max(1)))
        .build()
        .map_err(|error| {
            AppError::Internal(format!("failed to build {purpose} http client: {error}"))
        })
}
