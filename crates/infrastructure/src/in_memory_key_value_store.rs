use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ticketsense_application::{KeyValueStore, ScanPage};
use ticketsense_core::AppResult;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoreEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl StoreEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Process-local key-value store for single-instance deployments.
///
/// Entries are kept in key order; scan cursors are offsets into the live keys
/// matching the prefix.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, StoreEntry>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(Instant::now()) => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| !entry.is_live(Instant::now()))
        {
            entries.remove(key);
        }

        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> AppResult<()> {
        let now = Instant::now();
        let expires_at = ttl_seconds.map(|ttl_seconds| {
            now.checked_add(Duration::from_secs(ttl_seconds))
                .unwrap_or(now)
        });

        self.entries.write().await.insert(
            key.to_owned(),
            StoreEntry {
                value: value.to_owned(),
                expires_at,
            },
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .write()
            .await
            .remove(key)
            .is_some_and(|entry| entry.is_live(now)))
    }

    async fn scan_prefix(
        &self,
        prefix: &str,
        cursor: u64,
        batch_size: usize,
    ) -> AppResult<ScanPage> {
        let now = Instant::now();
        let offset = usize::try_from(cursor).unwrap_or(usize::MAX);
        let batch_size = batch_size.max(1);
        let entries = self.entries.read().await;

        let mut matching = entries
            .range(prefix.to_owned()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entry)| entry.is_live(now))
            .skip(offset);

        let page: Vec<(String, String)> = matching
            .by_ref()
            .take(batch_size)
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect();
        let has_more = matching.next().is_some();

        let next_cursor = if has_more {
            u64::try_from(offset.saturating_add(page.len())).unwrap_or(0)
        } else {
            0
        };

        Ok(ScanPage {
            entries: page,
            next_cursor,
        })
    }
}
