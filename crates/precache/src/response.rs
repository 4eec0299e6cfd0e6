//! # Cached Responses
//!
//! This module defines the stored request/response pair and the serve-path
//! label attached to every response handed back to a caller.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A response stored in (or served alongside) a cache bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// The request URL this response answers, exactly as it appears in the
    /// manifest or the fetch request.
    pub url: String,
    /// HTTP status code of the original response.
    pub status: u16,
    /// Content type of the resource, if the origin declared one.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Bytes,
    /// Unix timestamp of when the resource was fetched.
    pub fetched_at: u64,
}

impl CachedResponse {
    /// Create a new response fetched now.
    pub fn new(url: impl Into<String>, status: u16, body: Bytes) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: None,
            body,
            fetched_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Split into the sidecar metadata and the body bytes.
    pub fn into_parts(self) -> (ResponseMeta, Bytes) {
        let meta = ResponseMeta {
            url: self.url,
            status: self.status,
            content_type: self.content_type,
            fetched_at: self.fetched_at,
            size: self.body.len() as u64,
        };
        (meta, self.body)
    }

    /// Rebuild a response from sidecar metadata and body bytes.
    pub fn from_parts(meta: ResponseMeta, body: Bytes) -> Self {
        Self {
            url: meta.url,
            status: meta.status,
            content_type: meta.content_type,
            body,
            fetched_at: meta.fetched_at,
        }
    }
}

/// Metadata persisted next to a cached body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub fetched_at: u64,
    pub size: u64,
}

/// Which path produced a served response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeSource {
    /// Found in the current cache bucket and returned verbatim.
    Bucket,
    /// Missed the bucket; fetched live from the network.
    Network,
}

/// A response together with the path that produced it.
#[derive(Debug, Clone)]
pub struct Served {
    pub source: ServeSource,
    pub response: CachedResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_round_trip() {
        let response = CachedResponse::new("/styles.css", 200, Bytes::from_static(b"body {}"))
            .with_content_type("text/css");
        let expected = response.clone();

        let (meta, body) = response.into_parts();
        assert_eq!(meta.size, 7);

        let rebuilt = CachedResponse::from_parts(meta, body);
        assert_eq!(rebuilt, expected);
    }
}
