use reqwest::StatusCode;

use crate::service::Lifecycle;

// Custom error type for cache service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Server returned status code {0}")]
    Status(StatusCode),

    #[error("Store I/O error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Install aborted at {url}: {source}")]
    Install {
        url: String,
        #[source]
        source: Box<ServiceError>,
    },

    #[error("No generation installed yet (state: {0})")]
    NotInstalled(Lifecycle),

    #[error("Service is not active (state: {0})")]
    NotActive(Lifecycle),
}
