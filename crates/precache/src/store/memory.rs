//! # Memory Bucket Store
//!
//! In-memory backend. Buckets live only as long as the process; there is no
//! eviction policy here at all, version-gated deletion at activation is the
//! only way entries leave.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::response::CachedResponse;
use crate::store::bucket::{BucketStore, StoreResult};

type Buckets = HashMap<String, HashMap<String, CachedResponse>>;

/// In-memory bucket store backed by a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: RwLock<Buckets>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BucketStore for MemoryStore {
    async fn open(&self, bucket: &str) -> StoreResult<()> {
        self.buckets.write().entry(bucket.to_owned()).or_default();
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.buckets.read().keys().cloned().collect())
    }

    async fn delete(&self, bucket: &str) -> StoreResult<bool> {
        let existed = self.buckets.write().remove(bucket).is_some();
        if existed {
            debug!(bucket, "deleted memory bucket");
        }
        Ok(existed)
    }

    async fn get(&self, bucket: &str, url: &str) -> StoreResult<Option<CachedResponse>> {
        Ok(self
            .buckets
            .read()
            .get(bucket)
            .and_then(|entries| entries.get(url))
            .cloned())
    }

    async fn put(&self, bucket: &str, url: &str, response: CachedResponse) -> StoreResult<()> {
        self.buckets
            .write()
            .entry(bucket.to_owned())
            .or_default()
            .insert(url.to_owned(), response);
        Ok(())
    }

    async fn contains(&self, bucket: &str, url: &str) -> StoreResult<bool> {
        Ok(self
            .buckets
            .read()
            .get(bucket)
            .is_some_and(|entries| entries.contains_key(url)))
    }

    async fn urls(&self, bucket: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .buckets
            .read()
            .get(bucket)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn response(url: &str) -> CachedResponse {
        CachedResponse::new(url, 200, Bytes::from(format!("body of {url}")))
    }

    #[tokio::test]
    async fn test_put_get_hit() {
        let store = MemoryStore::new();
        store.open("v1").await.unwrap();
        store.put("v1", "/app.js", response("/app.js")).await.unwrap();

        let found = store.get("v1", "/app.js").await.unwrap().unwrap();
        assert_eq!(found.url, "/app.js");
        assert_eq!(found.body, Bytes::from_static(b"body of /app.js"));
    }

    #[tokio::test]
    async fn test_get_miss() {
        let store = MemoryStore::new();
        store.open("v1").await.unwrap();
        assert!(store.get("v1", "/missing").await.unwrap().is_none());
        assert!(store.get("no-such-bucket", "/app.js").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_entry() {
        let store = MemoryStore::new();
        store.put("v1", "/a", response("/a")).await.unwrap();
        let updated = CachedResponse::new("/a", 200, Bytes::from_static(b"fresh"));
        store.put("v1", "/a", updated).await.unwrap();

        assert_eq!(store.urls("v1").await.unwrap().len(), 1);
        let found = store.get("v1", "/a").await.unwrap().unwrap();
        assert_eq!(found.body, Bytes::from_static(b"fresh"));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = MemoryStore::new();
        store.open("v1").await.unwrap();
        store.open("v2").await.unwrap();

        let mut names = store.list().await.unwrap();
        names.sort();
        assert_eq!(names, ["v1", "v2"]);

        assert!(store.delete("v1").await.unwrap());
        assert!(!store.delete("v1").await.unwrap());
        assert_eq!(store.list().await.unwrap(), ["v2"]);
    }

    #[tokio::test]
    async fn test_contains() {
        let store = MemoryStore::new();
        store.put("v1", "/a", response("/a")).await.unwrap();
        assert!(store.contains("v1", "/a").await.unwrap());
        assert!(!store.contains("v1", "/b").await.unwrap());
        assert!(!store.contains("v2", "/a").await.unwrap());
    }
}
