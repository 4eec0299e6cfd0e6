//! # Cache Service Lifecycle
//!
//! The state machine driving a versioned asset cache: install populates the
//! current bucket from the manifest, activation evicts every stale bucket by
//! name, and fetch serves lookups with a live-network fallback. Explicit
//! transition methods replace the host's ad-hoc lifecycle event handlers so
//! the version-gated invalidation invariant stays checkable.

use std::fmt;

use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::fetch::Fetch;
use crate::response::{ServeSource, Served};
use crate::store::BucketStore;

/// Lifecycle state of the cache service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No generation installed by this instance.
    Parked,
    /// Install in progress: the current bucket is being populated.
    Installing,
    /// Current bucket fully populated; stale buckets not yet evicted.
    Installed,
    /// Activation in progress: stale buckets are being deleted.
    Evicting,
    /// Current generation is live and serving fetches.
    Active,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Parked => "parked",
            Lifecycle::Installing => "installing",
            Lifecycle::Installed => "installed",
            Lifecycle::Evicting => "evicting",
            Lifecycle::Active => "active",
        };
        f.write_str(name)
    }
}

/// Versioned asset cache with an install / activate / fetch lifecycle.
pub struct CacheService<S, F> {
    config: ServiceConfig,
    store: S,
    fetcher: F,
    state: Lifecycle,
}

impl<S, F> CacheService<S, F>
where
    S: BucketStore,
    F: Fetch,
{
    pub fn new(config: ServiceConfig, store: S, fetcher: F) -> Self {
        Self {
            config,
            store,
            fetcher,
            state: Lifecycle::Parked,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Name of the current cache generation's bucket.
    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// Populate the current-version bucket with every manifest URL.
    ///
    /// All-or-nothing: the first URL that cannot be fetched aborts the whole
    /// install, the prior state is restored, and whatever generation was live
    /// stays live. Every URL is fetched over the network even when already
    /// present, so re-installing an unchanged manifest refreshes the bucket
    /// in place without duplicating entries.
    pub async fn install(&mut self) -> Result<(), ServiceError> {
        let prior = self.state;
        self.state = Lifecycle::Installing;

        if let Err(err) = self.populate().await {
            self.state = prior;
            return Err(err);
        }

        self.state = Lifecycle::Installed;
        info!(
            bucket = %self.config.version,
            urls = self.config.manifest.len(),
            "install complete"
        );
        Ok(())
    }

    async fn populate(&self) -> Result<(), ServiceError> {
        let bucket = self.config.version.as_str();
        self.store.open(bucket).await?;
        debug!(bucket, "opened cache bucket");

        for url in &self.config.manifest {
            let response = self.fetcher.fetch(url).await.map_err(|e| {
                ServiceError::Install {
                    url: url.clone(),
                    source: Box::new(e),
                }
            })?;
            self.store.put(bucket, url, response).await?;
        }
        Ok(())
    }

    /// Delete every bucket whose name is not the current version, then go
    /// live. Stale buckets are removed unconditionally; version-name equality
    /// is the only criterion. Returns the number of buckets evicted.
    pub async fn activate(&mut self) -> Result<usize, ServiceError> {
        if self.state != Lifecycle::Installed {
            return Err(ServiceError::NotInstalled(self.state));
        }

        self.state = Lifecycle::Evicting;
        match self.evict_stale().await {
            Ok(evicted) => {
                self.state = Lifecycle::Active;
                info!(bucket = %self.config.version, evicted, "activation complete");
                Ok(evicted)
            }
            Err(err) => {
                self.state = Lifecycle::Installed;
                Err(err)
            }
        }
    }

    async fn evict_stale(&self) -> Result<usize, ServiceError> {
        let mut evicted = 0;
        for name in self.store.list().await? {
            if name != self.config.version {
                info!(bucket = %name, "deleting stale cache bucket");
                if self.store.delete(&name).await? {
                    evicted += 1;
                }
            }
        }
        Ok(evicted)
    }

    /// Adopt an already-populated current-version bucket.
    ///
    /// Returns `true` and goes live when the bucket exists (a previous
    /// process installed this generation); stays parked otherwise. Stale
    /// buckets are left alone: eviction only ever happens in [`activate`].
    ///
    /// [`activate`]: CacheService::activate
    pub async fn resume(&mut self) -> Result<bool, ServiceError> {
        if self.state == Lifecycle::Active {
            return Ok(true);
        }

        let names = self.store.list().await?;
        if names.iter().any(|name| name == &self.config.version) {
            self.state = Lifecycle::Active;
            debug!(bucket = %self.config.version, "resumed existing cache generation");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Serve a request: current bucket first, live network as fallback.
    ///
    /// A hit returns the cached response verbatim, with no freshness check
    /// and no revalidation. A miss performs exactly one live fetch and
    /// returns that response as-is; it is NOT written back into the bucket.
    /// A failed live fetch propagates to the caller.
    pub async fn fetch(&self, request: &str) -> Result<Served, ServiceError> {
        if self.state != Lifecycle::Active {
            return Err(ServiceError::NotActive(self.state));
        }

        if let Some(response) = self.store.get(&self.config.version, request).await? {
            debug!(request, bucket = %self.config.version, "served from cache");
            return Ok(Served {
                source: ServeSource::Bucket,
                response,
            });
        }

        debug!(request, "cache miss, falling back to network");
        let response = self.fetcher.fetch(request).await?;
        Ok(Served {
            source: ServeSource::Network,
            response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bytes::Bytes;
    use parking_lot::Mutex;
    use reqwest::StatusCode;

    use crate::manifest::Manifest;
    use crate::response::CachedResponse;
    use crate::store::MemoryStore;

    /// Counting in-memory fetcher; unknown URLs come back as 404.
    #[derive(Default)]
    struct MockFetch {
        resources: HashMap<String, Bytes>,
        failing: Mutex<HashSet<String>>,
        calls: AtomicUsize,
    }

    impl MockFetch {
        fn with_resources<const N: usize>(entries: [(&str, &str); N]) -> Self {
            Self {
                resources: entries
                    .into_iter()
                    .map(|(url, body)| (url.to_owned(), Bytes::from(body.to_owned())))
                    .collect(),
                ..Self::default()
            }
        }

        fn fail_on(&self, url: &str) {
            self.failing.lock().insert(url.to_owned());
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Fetch for MockFetch {
        async fn fetch(&self, request: &str) -> Result<CachedResponse, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.lock().contains(request) {
                return Err(ServiceError::Status(StatusCode::SERVICE_UNAVAILABLE));
            }
            match self.resources.get(request) {
                Some(body) => Ok(CachedResponse::new(request, 200, body.clone())),
                None => Err(ServiceError::Status(StatusCode::NOT_FOUND)),
            }
        }
    }

    fn manifest() -> Manifest {
        Manifest::new(["/", "/index.html", "/styles.css"])
    }

    fn fetcher() -> Arc<MockFetch> {
        Arc::new(MockFetch::with_resources([
            ("/", "<html>"),
            ("/index.html", "<html>"),
            ("/styles.css", "body {}"),
            ("/uncached.png", "png bytes"),
        ]))
    }

    fn service(
        version: &str,
        store: Arc<MemoryStore>,
        fetch: Arc<MockFetch>,
    ) -> CacheService<Arc<MemoryStore>, Arc<MockFetch>> {
        CacheService::new(ServiceConfig::new(version, manifest()), store, fetch)
    }

    #[tokio::test]
    async fn test_install_populates_bucket() {
        let store = Arc::new(MemoryStore::new());
        let mut svc = service("site-v1", store.clone(), fetcher());

        svc.install().await.unwrap();
        assert_eq!(svc.state(), Lifecycle::Installed);

        let mut urls = store.urls("site-v1").await.unwrap();
        urls.sort();
        assert_eq!(urls, ["/", "/index.html", "/styles.css"]);
    }

    #[tokio::test]
    async fn test_install_twice_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let fetch = fetcher();
        let mut svc = service("site-v1", store.clone(), fetch.clone());

        svc.install().await.unwrap();
        svc.install().await.unwrap();

        // Exactly the manifest URLs, no duplicates, and each install
        // re-fetched the full manifest over the network.
        let mut urls = store.urls("site-v1").await.unwrap();
        urls.sort();
        assert_eq!(urls, ["/", "/index.html", "/styles.css"]);
        assert_eq!(fetch.calls(), 6);
    }

    #[tokio::test]
    async fn test_install_failure_aborts_and_restores_state() {
        let store = Arc::new(MemoryStore::new());
        let fetch = fetcher();
        fetch.fail_on("/styles.css");
        let mut svc = service("site-v1", store.clone(), fetch.clone());

        let err = svc.install().await.unwrap_err();
        assert!(matches!(err, ServiceError::Install { ref url, .. } if url == "/styles.css"));
        assert_eq!(svc.state(), Lifecycle::Parked);
    }

    #[tokio::test]
    async fn test_failed_reinstall_keeps_active_generation_live() {
        let store = Arc::new(MemoryStore::new());
        let fetch = fetcher();
        let mut svc = service("site-v1", store.clone(), fetch.clone());

        svc.install().await.unwrap();
        svc.activate().await.unwrap();

        fetch.fail_on("/index.html");
        assert!(svc.install().await.is_err());

        // The live generation keeps serving.
        assert_eq!(svc.state(), Lifecycle::Active);
        let served = svc.fetch("/styles.css").await.unwrap();
        assert_eq!(served.source, ServeSource::Bucket);
    }

    #[tokio::test]
    async fn test_activation_evicts_exactly_the_stale_buckets() {
        let store = Arc::new(MemoryStore::new());
        store.open("v1").await.unwrap();
        store.open("v2").await.unwrap();

        let mut svc = service("v3-current", store.clone(), fetcher());
        svc.install().await.unwrap();
        let evicted = svc.activate().await.unwrap();

        assert_eq!(evicted, 2);
        assert_eq!(svc.state(), Lifecycle::Active);
        assert_eq!(store.list().await.unwrap(), ["v3-current"]);
    }

    #[tokio::test]
    async fn test_activate_requires_install() {
        let mut svc = service("site-v1", Arc::new(MemoryStore::new()), fetcher());
        let err = svc.activate().await.unwrap_err();
        assert!(matches!(err, ServiceError::NotInstalled(Lifecycle::Parked)));
    }

    #[tokio::test]
    async fn test_fetch_hit_issues_no_network_request() {
        let store = Arc::new(MemoryStore::new());
        let fetch = fetcher();
        let mut svc = service("site-v1", store, fetch.clone());
        svc.install().await.unwrap();
        svc.activate().await.unwrap();

        let calls_after_install = fetch.calls();
        let served = svc.fetch("/index.html").await.unwrap();

        assert_eq!(served.source, ServeSource::Bucket);
        assert_eq!(served.response.url, "/index.html");
        assert_eq!(fetch.calls(), calls_after_install);
    }

    #[tokio::test]
    async fn test_fetch_miss_issues_exactly_one_request_and_no_write_back() {
        let store = Arc::new(MemoryStore::new());
        let fetch = fetcher();
        let mut svc = service("site-v1", store.clone(), fetch.clone());
        svc.install().await.unwrap();
        svc.activate().await.unwrap();

        let baseline = fetch.calls();
        let served = svc.fetch("/uncached.png").await.unwrap();
        assert_eq!(served.source, ServeSource::Network);
        assert_eq!(fetch.calls(), baseline + 1);

        // Read-only fallback: the response was not written into the bucket,
        // so a second fetch goes to the network again.
        assert!(!store.contains("site-v1", "/uncached.png").await.unwrap());
        let served = svc.fetch("/uncached.png").await.unwrap();
        assert_eq!(served.source, ServeSource::Network);
        assert_eq!(fetch.calls(), baseline + 2);
    }

    #[tokio::test]
    async fn test_fetch_network_failure_propagates() {
        let store = Arc::new(MemoryStore::new());
        let fetch = fetcher();
        let mut svc = service("site-v1", store, fetch.clone());
        svc.install().await.unwrap();
        svc.activate().await.unwrap();

        fetch.fail_on("/uncached.png");
        let err = svc.fetch("/uncached.png").await.unwrap_err();
        assert!(matches!(err, ServiceError::Status(_)));
    }

    #[tokio::test]
    async fn test_fetch_requires_active_state() {
        let mut svc = service("site-v1", Arc::new(MemoryStore::new()), fetcher());
        assert!(matches!(
            svc.fetch("/").await.unwrap_err(),
            ServiceError::NotActive(Lifecycle::Parked)
        ));

        svc.install().await.unwrap();
        assert!(matches!(
            svc.fetch("/").await.unwrap_err(),
            ServiceError::NotActive(Lifecycle::Installed)
        ));
    }

    #[tokio::test]
    async fn test_resume_adopts_existing_generation() {
        let store = Arc::new(MemoryStore::new());
        let mut first = service("site-v1", store.clone(), fetcher());
        first.install().await.unwrap();
        first.activate().await.unwrap();

        // A later instance over the same store picks the generation up
        // without reinstalling.
        let fetch = fetcher();
        let mut second = service("site-v1", store, fetch.clone());
        assert!(second.resume().await.unwrap());
        assert_eq!(second.state(), Lifecycle::Active);

        let served = second.fetch("/index.html").await.unwrap();
        assert_eq!(served.source, ServeSource::Bucket);
        assert_eq!(fetch.calls(), 0);
    }

    #[tokio::test]
    async fn test_resume_without_bucket_stays_parked() {
        let mut svc = service("site-v1", Arc::new(MemoryStore::new()), fetcher());
        assert!(!svc.resume().await.unwrap());
        assert_eq!(svc.state(), Lifecycle::Parked);
    }
}
