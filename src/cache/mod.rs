//! Order cache (cache-aside protocol)
//!
//! Keys are derived deterministically (`order:<id>`), values are opaque
//! serialized text with a per-key TTL. Writes are unconditional
//! overwrites with no versioning, so concurrent writers race and the
//! last one wins; reads do not refresh the TTL; deletes are advisory.
//! The cache is never authoritative - the store is.

pub mod memory;

pub use memory::MemoryCache;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::models::order::ORDER_TABLE;

/// Cache backend errors
///
/// Never surfaced to a request: callers log and degrade to store-only
/// behavior.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value side cache with per-key TTL
#[async_trait]
pub trait Cache: Send + Sync {
    /// Unconditional overwrite of `key` with `value`, expiring after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Stored value, or `None` when absent or expired
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Best-effort removal
    async fn delete(&self, key: &str) -> CacheResult<()>;
}

/// Cache key for an order id
///
/// Accepts both the bare key and the prefixed `order:<id>` form and
/// normalizes to the latter, so path ids and record ids map to the
/// same entry.
pub fn order_key(id: &str) -> String {
    let key = id.strip_prefix("order:").unwrap_or(id);
    format!("{ORDER_TABLE}:{key}")
}
