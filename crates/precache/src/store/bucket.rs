//! # Bucket Store Trait
//!
//! The storage seam every backend implements. The host's cache storage is an
//! external collaborator; the lifecycle only ever talks to it through this
//! trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::response::CachedResponse;

/// Result of a store operation
pub type StoreResult<T> = std::result::Result<T, std::io::Error>;

/// A backend holding named buckets of url -> response pairs.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Open a bucket, creating it if absent.
    async fn open(&self, bucket: &str) -> StoreResult<()>;

    /// Names of all existing buckets.
    async fn list(&self) -> StoreResult<Vec<String>>;

    /// Delete a bucket and everything in it. Returns whether it existed.
    async fn delete(&self, bucket: &str) -> StoreResult<bool>;

    /// Look up a response by request URL.
    async fn get(&self, bucket: &str, url: &str) -> StoreResult<Option<CachedResponse>>;

    /// Store a response under its request URL, replacing any previous entry.
    async fn put(&self, bucket: &str, url: &str, response: CachedResponse) -> StoreResult<()>;

    /// Check whether a bucket holds an entry for the URL.
    async fn contains(&self, bucket: &str, url: &str) -> StoreResult<bool>;

    /// Request URLs currently stored in a bucket.
    async fn urls(&self, bucket: &str) -> StoreResult<Vec<String>>;
}

#[async_trait]
impl<S: BucketStore + ?Sized> BucketStore for Arc<S> {
    async fn open(&self, bucket: &str) -> StoreResult<()> {
        (**self).open(bucket).await
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        (**self).list().await
    }

    async fn delete(&self, bucket: &str) -> StoreResult<bool> {
        (**self).delete(bucket).await
    }

    async fn get(&self, bucket: &str, url: &str) -> StoreResult<Option<CachedResponse>> {
        (**self).get(bucket, url).await
    }

    async fn put(&self, bucket: &str, url: &str, response: CachedResponse) -> StoreResult<()> {
        (**self).put(bucket, url, response).await
    }

    async fn contains(&self, bucket: &str, url: &str) -> StoreResult<bool> {
        (**self).contains(bucket, url).await
    }

    async fn urls(&self, bucket: &str) -> StoreResult<Vec<String>> {
        (**self).urls(bucket).await
    }
}
