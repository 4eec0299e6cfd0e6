use std::time::Duration;

use url::Url;

use crate::manifest::Manifest;

const DEFAULT_USER_AGENT: &str = concat!("sitekit/", env!("CARGO_PKG_VERSION"));

/// Configurable options for the cache service.
///
/// One explicit configuration object replaces ambient globals: the versioned
/// bucket name is the single source of truth for which cache generation is
/// valid, and bumping it forces a full re-fetch of the manifest plus eviction
/// of every older bucket on the next activation.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Versioned bucket name, e.g. `"site-v1.0.0"`. Must change whenever the
    /// manifest changes.
    pub version: String,

    /// Resource URLs cached at install time.
    pub manifest: Manifest,

    /// Base URL for resolving root-relative manifest entries and requests.
    pub origin: Url,

    /// Overall timeout for each HTTP request
    pub timeout: Duration,

    /// Connection timeout (time to establish initial connection)
    pub connect_timeout: Duration,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// User agent string
    pub user_agent: String,
}

impl ServiceConfig {
    /// Create a configuration for the given cache generation.
    pub fn new(version: impl Into<String>, manifest: Manifest) -> Self {
        Self {
            version: version.into(),
            manifest,
            origin: Url::parse("http://localhost/").expect("literal origin URL"),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the origin used to resolve root-relative requests.
    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin = origin;
        self
    }

    /// Set the overall timeout for each HTTP request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set whether to follow redirects.
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
