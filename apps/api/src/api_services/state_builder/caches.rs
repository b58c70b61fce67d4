use std::sync::Arc;

use ticketsense_application::CacheGateway;
use ticketsense_core::AppResult;
use ticketsense_infrastructure::{InMemoryKeyValueStore, RedisKeyValueStore};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, CacheBackendConfig};
use crate::state::CacheProbe;

use super::super::redis::{build_redis_client, redis_is_reachable};

/// Builds the record cache.
///
/// An unreachable Redis at startup is only logged: the store reconnects per
/// call and the gateway degrades individual reads and writes until it is back.
pub(super) async fn build_record_cache(config: &ApiConfig) -> AppResult<(CacheGateway, CacheProbe)> {
    let prefix = config.cache_key_prefix.as_str();
    let ttl_seconds = Some(config.cache_ttl_seconds);

    match &config.cache_backend {
        CacheBackendConfig::Disabled => {
            info!("record cache disabled");
            Ok((CacheGateway::disabled(prefix), CacheProbe::Disabled))
        }
        CacheBackendConfig::Memory => {
            info!("record cache using in-memory store");
            Ok((
                CacheGateway::new(Arc::new(InMemoryKeyValueStore::new()), prefix, ttl_seconds),
                CacheProbe::Memory,
            ))
        }
        CacheBackendConfig::Redis(redis_url) => {
            let client = build_redis_client(redis_url.as_str())?;
            if redis_is_reachable(&client).await {
                info!("record cache using redis");
            } else {
                warn!("redis unreachable at startup, record cache will retry per request");
            }

            Ok((
                CacheGateway::new(
                    Arc::new(RedisKeyValueStore::new(client.clone())),
                    prefix,
                    ttl_seconds,
                ),
                CacheProbe::Redis(client),
            ))
        }
    }
}
