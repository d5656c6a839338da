//! Last-access timestamps per container.
//!
//! The whole map is stored as one JSON object under a single key of the
//! [`KeyValueStore`]: `{"<containerId>": <epoch millis>, ...}`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use boxsync_core::result::AppResult;
use boxsync_core::traits::store::KeyValueStore;
use boxsync_core::types::ContainerId;

/// Map of container id to last access time in epoch milliseconds.
pub type AccessMap = HashMap<ContainerId, i64>;

/// Persists when each container was last visited.
#[derive(Debug)]
pub struct AccessTracker {
    store: Arc<dyn KeyValueStore>,
    key: String,
    /// Serializes read-modify-write cycles on the stored map.
    write_lock: Mutex<()>,
}

impl AccessTracker {
    /// Create a tracker storing its map under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The store key holding the map.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Forget every recorded access.
    pub async fn reset(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(&self.key).await?;
        debug!(key = %self.key, "Access map reset");
        Ok(())
    }

    /// Read the whole map. Missing, unreadable, or corrupt data reads as empty.
    pub async fn snapshot(&self) -> AccessMap {
        match self.store.get(&self.key).await {
            Ok(Some(raw)) => parse_map(&raw),
            Ok(None) => AccessMap::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read access map, treating as empty");
                AccessMap::new()
            }
        }
    }

    /// Last access of `id` in epoch milliseconds, `0` if never visited.
    pub async fn last_access(&self, id: ContainerId) -> i64 {
        self.snapshot().await.get(&id).copied().unwrap_or(0)
    }

    /// Stamp every id in `ids` with the current time.
    pub async fn record_access(&self, ids: &[ContainerId]) -> AppResult<()> {
        self.record_access_at(ids, Utc::now().timestamp_millis()).await
    }

    /// Stamp every id in `ids` with `now_ms`.
    pub async fn record_access_at(&self, ids: &[ContainerId], now_ms: i64) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;
        let mut map = self.snapshot().await;
        for id in ids {
            map.insert(*id, now_ms);
        }
        let raw = serde_json::to_string(&map)?;
        self.store.set(&self.key, &raw).await?;

        debug!(count = ids.len(), now_ms, "Recorded container access");
        Ok(())
    }
}

fn parse_map(raw: &str) -> AccessMap {
    match serde_json::from_str::<AccessMap>(raw) {
        Ok(map) => map,
        Err(e) => {
            warn!(error = %e, "Corrupt access map, treating as empty");
            AccessMap::new()
        }
    }
}
