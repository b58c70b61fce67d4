//! Redis-backed key-value store for cached records.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use ticketsense_application::{KeyValueStore, ScanPage};
use ticketsense_core::{AppError, AppResult};

/// Redis implementation of the key-value store port.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    client: redis::Client,
}

impl RedisKeyValueStore {
    /// Creates a store adapter with a configured Redis client.
    #[must_use]
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Unavailable(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut connection = self.connection().await?;
        connection.get(key).await.map_err(|error| {
            AppError::Unavailable(format!("failed to read cache entry '{key}': {error}"))
        })
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> AppResult<()> {
        let mut connection = self.connection().await?;
        let result: redis::RedisResult<()> = match ttl_seconds {
            Some(ttl_seconds) => connection.set_ex(key, value, ttl_seconds).await,
            None => connection.set(key, value).await,
        };

        result.map_err(|error| {
            AppError::Unavailable(format!("failed to write cache entry '{key}': {error}"))
        })
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let mut connection = self.connection().await?;
        let removed: usize = connection.del(key).await.map_err(|error| {
            AppError::Unavailable(format!("failed to delete cache entry '{key}': {error}"))
        })?;

        Ok(removed > 0)
    }

    async fn scan_prefix(
        &self,
        prefix: &str,
        cursor: u64,
        batch_size: usize,
    ) -> AppResult<ScanPage> {
        let mut connection = self.connection().await?;
        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(prefix_pattern(prefix))
            .arg("COUNT")
            .arg(batch_size.max(1))
            .query_async(&mut connection)
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("failed to scan cache prefix '{prefix}': {error}"))
            })?;

        if keys.is_empty() {
            return Ok(ScanPage {
                entries: Vec::new(),
                next_cursor,
            });
        }

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut connection)
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("failed to read scanned cache entries: {error}"))
            })?;

        // Keys may expire between SCAN and MGET.
        let entries = keys
            .into_iter()
            .zip(values)
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect();

        Ok(ScanPage {
            entries,
            next_cursor,
        })
    }
}

/// Builds a `MATCH` pattern matching keys that start with `prefix` literally.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for character in prefix.chars() {
        if matches!(character, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(character);
    }
    pattern.push('*');
    pattern
}

#[cfg(test)]
mod tests {
    use super::prefix_pattern;

    #[test]
    fn prefix_pattern_appends_wildcard() {
        assert_eq!(prefix_pattern("ticketsense:evaluation:"), "ticketsense:evaluation:*");
    }

    #[test]
    fn prefix_pattern_escapes_glob_characters() {
        assert_eq!(prefix_pattern("a*b?[c]\\:"), "a\\*b\\?\\[c\\]\\\\:*");
    }
}
