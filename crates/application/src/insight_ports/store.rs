use async_trait::async_trait;
use ticketsense_core::AppResult;

/// One page of a prefix scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Key/value pairs in store enumeration order.
    pub entries: Vec<(String, String)>,
    /// Cursor for the next page; zero once the scan is complete.
    pub next_cursor: u64,
}

/// Key-value store backing the record cache.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads one value.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Writes one value, optionally expiring after `ttl_seconds`.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> AppResult<()>;

    /// Removes one value and reports whether it existed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Returns one page of entries whose key starts with `prefix`.
    ///
    /// Start with cursor zero and continue with `next_cursor` until it is zero.
    async fn scan_prefix(&self, prefix: &str, cursor: u64, batch_size: usize)
    -> AppResult<ScanPage>;
}
