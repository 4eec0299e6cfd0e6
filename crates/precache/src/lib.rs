//! # precache
//!
//! A versioned offline asset cache for static sites. A cache generation is
//! identified by its bucket name; installing a generation fetches a fixed
//! manifest of resources into its bucket, activating it deletes every other
//! bucket, and fetches are served from the bucket with a live-network
//! fallback.
//!
//! ## Features
//!
//! - Explicit install / activate / fetch lifecycle as a small state machine
//! - Version-gated eviction: bumping the bucket name is the whole
//!   invalidation strategy
//! - Pluggable storage backends (in-memory, on-disk)
//! - Read-only network fallback for requests outside the manifest
//! - Push-notification payload contract for host relays

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod push;
pub mod response;
pub mod service;
pub mod store;

pub use client::create_client;
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use fetch::{Fetch, HttpFetcher};
pub use manifest::Manifest;
pub use push::{
    ActionId, ClickOutcome, NotificationAction, PushDefaults, PushPayload, click_outcome,
};
pub use response::{CachedResponse, ResponseMeta, ServeSource, Served};
pub use service::{CacheService, Lifecycle};
pub use store::{BucketStore, DiskStore, MemoryStore, StoreResult};
