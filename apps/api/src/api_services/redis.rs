use redis::AsyncCommands;
use ticketsense_core::AppError;
use tracing::warn;

pub fn build_redis_client(redis_url: &str) -> Result<redis::Client, AppError> {
    redis::Client::open(redis_url)
        .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))
}

/// Returns whether Redis answers a ping; failures are logged.
pub async fn redis_is_reachable(client: &redis::Client) -> bool {
    let mut connection = match client.get_multiplexed_async_connection().await {
        Ok(connection) => connection,
        Err(error) => {
            warn!(error = %error, "redis connection failed");
            return false;
        }
    };

    match connection.ping::<String>().await {
        Ok(_) => true,
        Err(error) => {
            warn!(error = %error, "redis ping failed");
            false
        }
    }
}
