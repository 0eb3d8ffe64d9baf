//! Query cache and invalidation
//!
//! Cached reads are addressed by hierarchical keys such as
//! `["profile", "<id>"]` or `["profiles"]`. Invalidating a key drops every
//! entry whose key starts with it, so `["profile"]` clears all single-profile
//! reads at once. Invalidating a key with no entries is a no-op.

use crate::error::CacheError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

/// Hierarchical cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Key of a single cached profile read
    pub fn profile(namespace: &str, id: &str) -> Self {
        Self::new([namespace, id])
    }

    /// Key of the unscoped profile collection
    pub fn collection(name: &str) -> Self {
        Self::new([name])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True when `prefix` addresses this key or one of its ancestors
    pub fn starts_with(&self, prefix: &CacheKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Cache invalidation side channel used by the writer
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Mark every read cached under `key` (or beneath it) as stale
    async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError>;
}

/// In-process query cache
///
/// Cheap to clone; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<CacheKey, Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: CacheKey, value: Value) {
        self.entries.write().await.insert(key, value);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove every entry under `prefix`, returning how many were dropped
    pub async fn remove_prefix(&self, prefix: &CacheKey) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }
}

#[async_trait]
impl CacheLayer for QueryCache {
    async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        let removed = self.remove_prefix(key).await;
        trace!("Invalidated {} cache entries under {}", removed, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_key_prefix_matching() {
        let key = CacheKey::profile("profile", "id-1");

        assert!(key.starts_with(&CacheKey::collection("profile")));
        assert!(key.starts_with(&key));
        assert!(!key.starts_with(&CacheKey::collection("profiles")));
        assert!(!key.starts_with(&CacheKey::profile("profile", "id-2")));
    }

    #[test]
    fn test_cache_key_display() {
        let key = CacheKey::profile("profile", "id-1");
        assert_eq!(key.to_string(), "[profile, id-1]");
    }

    #[tokio::test]
    async fn test_invalidate_exact_key() {
        let cache = QueryCache::new();
        cache.insert(CacheKey::profile("profile", "id-1"), json!({"id": "id-1"})).await;
        cache.insert(CacheKey::profile("profile", "id-2"), json!({"id": "id-2"})).await;

        cache.invalidate(&CacheKey::profile("profile", "id-1")).await.unwrap();

        assert!(cache.get(&CacheKey::profile("profile", "id-1")).await.is_none());
        assert!(cache.get(&CacheKey::profile("profile", "id-2")).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_prefix_clears_descendants() {
        let cache = QueryCache::new();
        cache.insert(CacheKey::profile("profile", "id-1"), json!(1)).await;
        cache.insert(CacheKey::profile("profile", "id-2"), json!(2)).await;
        cache.insert(CacheKey::collection("profiles"), json!([])).await;

        cache.invalidate(&CacheKey::collection("profile")).await.unwrap();

        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&CacheKey::collection("profiles")).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_missing_key_is_noop() {
        let cache = QueryCache::new();
        cache.insert(CacheKey::collection("profiles"), json!([])).await;

        let key = CacheKey::profile("profile", "missing");
        assert!(cache.invalidate(&key).await.is_ok());
        assert!(cache.invalidate(&key).await.is_ok());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = QueryCache::new();
        let other = cache.clone();

        other.insert(CacheKey::collection("profiles"), json!([])).await;
        assert!(!cache.is_empty().await);
    }
}
