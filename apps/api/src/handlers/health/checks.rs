use redis::AsyncCommands;
use tracing::warn;

use crate::dto::HealthDependencyStatus;
use crate::state::CacheProbe;

const REDIS_UNREACHABLE_DETAIL: &str = "redis unreachable";

pub(super) async fn check_cache(probe: &CacheProbe) -> HealthDependencyStatus {
    match probe {
        CacheProbe::Disabled => HealthDependencyStatus {
            status: "disabled",
            detail: None,
        },
        CacheProbe::Memory => HealthDependencyStatus {
            status: "ok",
            detail: Some("in-memory store".to_owned()),
        },
        CacheProbe::Redis(client) => check_redis(client).await,
    }
}

async fn check_redis(client: &redis::Client) -> HealthDependencyStatus {
    let mut connection = match client.get_multiplexed_async_connection().await {
        Ok(connection) => connection,
        Err(error) => {
            warn!(error = %error, "health check: redis connection failed");
            return redis_unreachable();
        }
    };

    match connection.ping::<String>().await {
        Ok(value) if value.eq_ignore_ascii_case("pong") => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Ok(value) => {
            warn!(response = %value, "health check: unexpected redis ping response");
            redis_unreachable()
        }
        Err(error) => {
            warn!(error = %error, "health check: redis ping failed");
            redis_unreachable()
        }
    }
}

fn redis_unreachable() -> HealthDependencyStatus {
    HealthDependencyStatus {
        status: "error",
        detail: Some(REDIS_UNREACHABLE_DETAIL.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use crate::state::CacheProbe;

    use super::{REDIS_UNREACHABLE_DETAIL, check_cache};

    #[tokio::test]
    async fn unreachable_redis_reports_a_fixed_detail() {
        let client = redis::Client::open("redis://127.0.0.1:1");
        let Ok(client) = client else {
            panic!("redis url should parse");
        };

        let status = check_cache(&CacheProbe::Redis(client)).await;

        assert_eq!(status.status, "error");
        assert_eq!(status.detail.as_deref(), Some(REDIS_UNREACHABLE_DETAIL));
    }

    #[tokio::test]
    async fn disabled_cache_has_no_detail() {
        let status = check_cache(&CacheProbe::Disabled).await;
        assert_eq!(status.status, "disabled");
        assert!(status.detail.is_none());
    }
}
