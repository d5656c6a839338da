//! Key-value store trait for persisted client state.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for opaque string key-value backends (in-memory or on disk).
///
/// Values are serialized JSON. Callers own the encoding and must tolerate
/// values they cannot parse.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Check that the backend is usable.
    async fn health_check(&self) -> AppResult<bool>;
}
