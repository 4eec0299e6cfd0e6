//! # Disk Bucket Store
//!
//! File-backed bucket store: one directory per bucket, and per entry a body
//! file named by the SHA-256 of the request URL plus a `.meta` JSON sidecar.
//! Buckets survive the process, which is what lets a later invocation resume
//! an already-installed generation.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io;
use tracing::{debug, warn};

use crate::response::{CachedResponse, ResponseMeta};
use crate::store::bucket::{BucketStore, StoreResult};

#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
    initialized: Arc<AtomicBool>,
}

impl DiskStore {
    /// Create a disk store rooted at the given directory.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Initialize the root directory once.
    async fn ensure_initialized(&self) -> io::Result<()> {
        // Fast path - already initialized
        if self.initialized.load(Ordering::Relaxed) {
            return Ok(());
        }

        if self
            .initialized
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            fs::create_dir_all(&self.root).await?;
            self.initialized.store(true, Ordering::Release);
        } else {
            // Another task is initializing, wait for it to complete
            while !self.initialized.load(Ordering::Acquire) {
                tokio::task::yield_now().await;
            }
        }

        Ok(())
    }

    fn bucket_dir(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }

    /// Paths of the body file and metadata sidecar for an entry.
    fn entry_paths(&self, bucket: &str, url: &str) -> (PathBuf, PathBuf) {
        let mut hasher = Sha256::new();
        hasher.update(url);
        let hash = hasher.finalize();

        let data = self.bucket_dir(bucket).join(format!("{hash:x}"));
        let meta = data.with_extension("meta");
        (data, meta)
    }
}

#[async_trait::async_trait]
impl BucketStore for DiskStore {
    async fn open(&self, bucket: &str) -> StoreResult<()> {
        self.ensure_initialized().await?;
        fs::create_dir_all(self.bucket_dir(bucket)).await
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        self.ensure_initialized().await?;

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    async fn delete(&self, bucket: &str) -> StoreResult<bool> {
        self.ensure_initialized().await?;

        match fs::remove_dir_all(self.bucket_dir(bucket)).await {
            Ok(()) => {
                debug!(bucket, "deleted disk bucket");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get(&self, bucket: &str, url: &str) -> StoreResult<Option<CachedResponse>> {
        self.ensure_initialized().await?;

        let (data_path, meta_path) = self.entry_paths(bucket, url);
        if !fs::try_exists(&meta_path).await? || !fs::try_exists(&data_path).await? {
            return Ok(None);
        }

        let meta_bytes = fs::read(&meta_path).await?;
        let meta: ResponseMeta = match serde_json::from_slice(&meta_bytes) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = ?meta_path, error = %e, "Failed to parse cache sidecar, treating as miss");
                let _ = fs::remove_file(&data_path).await;
                let _ = fs::remove_file(&meta_path).await;
                return Ok(None);
            }
        };

        let body = Bytes::from(fs::read(&data_path).await?);
        Ok(Some(CachedResponse::from_parts(meta, body)))
    }

    async fn put(&self, bucket: &str, url: &str, response: CachedResponse) -> StoreResult<()> {
        self.ensure_initialized().await?;
        fs::create_dir_all(self.bucket_dir(bucket)).await?;

        let (data_path, meta_path) = self.entry_paths(bucket, url);
        let (meta, body) = response.into_parts();
        let meta_bytes = serde_json::to_vec(&meta).map_err(io::Error::other)?;

        fs::write(&data_path, &body).await?;
        fs::write(&meta_path, &meta_bytes).await
    }

    async fn contains(&self, bucket: &str, url: &str) -> StoreResult<bool> {
        self.ensure_initialized().await?;

        let (data_path, meta_path) = self.entry_paths(bucket, url);
        Ok(fs::try_exists(&data_path).await? && fs::try_exists(&meta_path).await?)
    }

    async fn urls(&self, bucket: &str) -> StoreResult<Vec<String>> {
        self.ensure_initialized().await?;

        let dir = self.bucket_dir(bucket);
        if !fs::try_exists(&dir).await? {
            return Ok(Vec::new());
        }

        let mut urls = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "meta") {
                continue;
            }
            match serde_json::from_slice::<ResponseMeta>(&fs::read(&path).await?) {
                Ok(meta) => urls.push(meta.url),
                Err(e) => warn!(path = ?path, error = %e, "Skipping unreadable cache sidecar"),
            }
        }
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, DiskStore) {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path().join("cache"));
        (dir, store)
    }

    fn response(url: &str, body: &'static [u8]) -> CachedResponse {
        CachedResponse::new(url, 200, Bytes::from_static(body)).with_content_type("text/plain")
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let (_dir, store) = store();
        store
            .put("site-v1", "/app.js", response("/app.js", b"console.log(1)"))
            .await
            .unwrap();

        let found = store.get("site-v1", "/app.js").await.unwrap().unwrap();
        assert_eq!(found.url, "/app.js");
        assert_eq!(found.status, 200);
        assert_eq!(found.content_type.as_deref(), Some("text/plain"));
        assert_eq!(found.body, Bytes::from_static(b"console.log(1)"));
    }

    #[tokio::test]
    async fn test_get_miss() {
        let (_dir, store) = store();
        store.open("site-v1").await.unwrap();
        assert!(store.get("site-v1", "/missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_sidecar_is_a_miss() {
        let (_dir, store) = store();
        store
            .put("site-v1", "/app.js", response("/app.js", b"x"))
            .await
            .unwrap();

        let (_, meta_path) = store.entry_paths("site-v1", "/app.js");
        fs::write(&meta_path, b"not json").await.unwrap();

        assert!(store.get("site-v1", "/app.js").await.unwrap().is_none());
        // The broken pair is removed, not left to fail again
        assert!(!store.contains("site-v1", "/app.js").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_delete_buckets() {
        let (_dir, store) = store();
        store.open("site-v1").await.unwrap();
        store.open("site-v2").await.unwrap();

        let mut names = store.list().await.unwrap();
        names.sort();
        assert_eq!(names, ["site-v1", "site-v2"]);

        assert!(store.delete("site-v1").await.unwrap());
        assert!(!store.delete("site-v1").await.unwrap());
        assert_eq!(store.list().await.unwrap(), ["site-v2"]);
    }

    #[tokio::test]
    async fn test_urls_lists_stored_requests() {
        let (_dir, store) = store();
        store
            .put("site-v1", "/", response("/", b"<html>"))
            .await
            .unwrap();
        store
            .put(
                "site-v1",
                "https://cdn.example.com/lib.css",
                response("https://cdn.example.com/lib.css", b"body{}"),
            )
            .await
            .unwrap();

        let mut urls = store.urls("site-v1").await.unwrap();
        urls.sort();
        assert_eq!(urls, ["/", "https://cdn.example.com/lib.css"]);
        assert!(store.urls("no-such-bucket").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_replaces_entry() {
        let (_dir, store) = store();
        store
            .put("site-v1", "/a", response("/a", b"old"))
            .await
            .unwrap();
        store
            .put("site-v1", "/a", response("/a", b"new"))
            .await
            .unwrap();

        assert_eq!(store.urls("site-v1").await.unwrap().len(), 1);
        let found = store.get("site-v1", "/a").await.unwrap().unwrap();
        assert_eq!(found.body, Bytes::from_static(b"new"));
    }
}
