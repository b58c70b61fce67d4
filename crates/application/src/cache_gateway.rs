//! Namespaced JSON record cache over a key-value store.
//!
//! The gateway never fails a request because of the store: read errors are
//! misses and write errors are dropped, both with a warning. Only the scan
//! used by analytics reports unavailability to its caller.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use ticketsense_core::{AppError, AppResult, TicketId};
use tracing::warn;

use crate::insight_ports::KeyValueStore;

const SCAN_BATCH_SIZE: usize = 100;

/// Record family stored under its own key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordNamespace {
    /// Ticket summaries.
    Summary,
    /// Ticket quality evaluations.
    Evaluation,
}

impl RecordNamespace {
    /// Returns the stable namespace segment.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Evaluation => "evaluation",
        }
    }
}

impl FromStr for RecordNamespace {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "summary" => Ok(Self::Summary),
            "evaluation" => Ok(Self::Evaluation),
            other => Err(AppError::Validation(format!(
                "unknown record namespace '{other}', expected 'summary' or 'evaluation'"
            ))),
        }
    }
}

/// Record cache with namespaced keys and a disabled mode.
#[derive(Clone)]
pub struct CacheGateway {
    store: Option<Arc<dyn KeyValueStore>>,
    key_prefix: String,
    ttl_seconds: Option<u64>,
}

impl CacheGateway {
    /// Creates a gateway backed by a store.
    ///
    /// A `ttl_seconds` of `Some(0)` is treated as no expiry.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        key_prefix: impl Into<String>,
        ttl_seconds: Option<u64>,
    ) -> Self {
        Self {
            store: Some(store),
            key_prefix: key_prefix.into(),
            ttl_seconds: ttl_seconds.filter(|ttl| *ttl > 0),
        }
    }

    /// Creates a gateway with no backing store: every read misses.
    #[must_use]
    pub fn disabled(key_prefix: impl Into<String>) -> Self {
        Self {
            store: None,
            key_prefix: key_prefix.into(),
            ttl_seconds: None,
        }
    }

    /// Returns whether a backing store is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Returns the cache key of one record.
    #[must_use]
    pub fn key_for(&self, namespace: RecordNamespace, ticket_id: &TicketId) -> String {
        format!("{}{ticket_id}", self.namespace_prefix(namespace))
    }

    fn namespace_prefix(&self, namespace: RecordNamespace) -> String {
        format!("{}:{}:", self.key_prefix, namespace.as_str())
    }

    /// Reads one record; store errors and undecodable entries count as misses.
    pub async fn get<T>(&self, namespace: RecordNamespace, ticket_id: &TicketId) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let store = self.store.as_ref()?;
        let key = self.key_for(namespace, ticket_id);

        let encoded = match store.get(key.as_str()).await {
            Ok(encoded) => encoded?,
            Err(error) => {
                warn!(key = %key, error = %error, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<T>(encoded.as_str()) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(key = %key, error = %error, "cached record is not decodable, treating as miss");
                None
            }
        }
    }

    /// Writes one record; failures are logged and dropped.
    pub async fn put<T>(&self, namespace: RecordNamespace, ticket_id: &TicketId, record: &T)
    where
        T: Serialize,
    {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let key = self.key_for(namespace, ticket_id);

        let encoded = match serde_json::to_string(record) {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(key = %key, error = %error, "failed to encode record for cache");
                return;
            }
        };

        if let Err(error) = store
            .set(key.as_str(), encoded.as_str(), self.ttl_seconds)
            .await
        {
            warn!(key = %key, error = %error, "cache write failed, continuing uncached");
        }
    }

    /// Removes one record and reports whether it existed.
    pub async fn evict(&self, namespace: RecordNamespace, ticket_id: &TicketId) -> AppResult<bool> {
        let Some(store) = self.store.as_ref() else {
            return Ok(false);
        };

        store.delete(self.key_for(namespace, ticket_id).as_str()).await
    }

    /// Reads every record of a namespace in store enumeration order.
    ///
    /// Fails with `AppError::Unavailable` when the gateway is disabled or the
    /// store cannot be scanned. Undecodable entries are skipped.
    pub async fn scan<T>(&self, namespace: RecordNamespace) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("record cache is disabled".to_owned()))?;
        let prefix = self.namespace_prefix(namespace);

        let mut records = Vec::new();
        let mut seen_keys = HashSet::new();
        let mut cursor = 0_u64;
        loop {
            let page = store
                .scan_prefix(prefix.as_str(), cursor, SCAN_BATCH_SIZE)
                .await
                .map_err(|error| {
                    AppError::Unavailable(format!("record cache scan failed: {error}"))
                })?;

            for (key, encoded) in page.entries {
                if !seen_keys.insert(key.clone()) {
                    continue;
                }

                match serde_json::from_str::<T>(encoded.as_str()) {
                    Ok(record) => records.push(record),
                    Err(error) => {
                        warn!(key = %key, error = %error, "skipping undecodable cached record");
                    }
                }
            }

            if page.next_cursor == 0 {
                break;
            }
            cursor = page.next_cursor;
        }

        Ok(records)
    }
}
