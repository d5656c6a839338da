//! In-memory store implementation using the moka crate.

use async_trait::async_trait;
use moka::future::Cache;

use boxsync_core::result::AppResult;
use boxsync_core::traits::store::KeyValueStore;

/// In-memory key-value store using moka.
///
/// Entries never expire; capacity bounds the number of keys.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    /// The underlying moka cache.
    cache: Cache<String, String>,
}

impl MemoryStore {
    /// Create a new in-memory store holding at most `max_capacity` keys.
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
