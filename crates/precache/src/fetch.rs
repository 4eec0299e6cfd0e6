//! # Live Fetch
//!
//! The network collaborator: used to populate a bucket at install time and as
//! the fallback when a request misses the cache. One request, one attempt;
//! failures propagate to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::error::ServiceError;
use crate::response::CachedResponse;

/// One live network request for a resource.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch `request` from the network. The request string may be absolute
    /// or root-relative; resolution is the implementation's concern.
    async fn fetch(&self, request: &str) -> Result<CachedResponse, ServiceError>;
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for Arc<F> {
    async fn fetch(&self, request: &str) -> Result<CachedResponse, ServiceError> {
        (**self).fetch(request).await
    }
}

/// reqwest-backed fetcher resolving root-relative requests against a fixed
/// origin.
pub struct HttpFetcher {
    client: Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(client: Client, origin: Url) -> Self {
        Self { client, origin }
    }

    /// Resolve a request string to an absolute URL.
    fn resolve(&self, request: &str) -> Result<Url, ServiceError> {
        match Url::parse(request) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .origin
                .join(request)
                .map_err(|e| ServiceError::Url(format!("{request}: {e}"))),
            Err(e) => Err(ServiceError::Url(format!("{request}: {e}"))),
        }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &str) -> Result<CachedResponse, ServiceError> {
        let url = self.resolve(request)?;
        debug!(request, url = %url, "fetching resource");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;

        let mut cached = CachedResponse::new(request, status.as_u16(), body);
        if let Some(content_type) = content_type {
            cached = cached.with_content_type(content_type);
        }
        Ok(cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(
            Client::new(),
            Url::parse("https://example.com").unwrap(),
        )
    }

    #[test]
    fn test_resolve_absolute_url_passes_through() {
        let url = fetcher().resolve("https://cdn.example.org/lib.js").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.org/lib.js");
    }

    #[test]
    fn test_resolve_root_relative_against_origin() {
        let url = fetcher().resolve("/styles.css").unwrap();
        assert_eq!(url.as_str(), "https://example.com/styles.css");

        let root = fetcher().resolve("/").unwrap();
        assert_eq!(root.as_str(), "https://example.com/");
    }

    #[test]
    fn test_resolve_rejects_garbage() {
        assert!(matches!(
            fetcher().resolve("http://"),
            Err(ServiceError::Url(_))
        ));
    }
}
