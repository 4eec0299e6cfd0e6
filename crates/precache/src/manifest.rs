//! # Asset Manifest
//!
//! The fixed list of resource URLs a cache generation is populated with at
//! install time. The list is decided at build time and shipped alongside the
//! version name; changing either forces a new generation.

use std::collections::HashSet;
use std::slice;

use serde::{Deserialize, Serialize};

/// Ordered list of resource URLs to cache at install time.
///
/// Entries may be absolute (third-party CDN assets) or root-relative
/// (same-origin assets); the cache treats both identically as opaque keys.
/// Duplicates are dropped on construction, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Manifest {
    urls: Vec<String>,
}

impl Manifest {
    /// Create a manifest from URL strings, preserving order and deduplicating.
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let urls = urls
            .into_iter()
            .map(Into::into)
            .filter(|url| seen.insert(url.clone()))
            .collect();
        Self { urls }
    }

    /// Parse a manifest from a JSON array of URL strings.
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Iterate the URLs in manifest order.
    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.urls.iter()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

impl From<Vec<String>> for Manifest {
    fn from(urls: Vec<String>) -> Self {
        Self::new(urls)
    }
}

impl From<Manifest> for Vec<String> {
    fn from(manifest: Manifest) -> Self {
        manifest.urls
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}
