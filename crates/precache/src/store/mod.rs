//! # Bucket Storage
//!
//! Storage backends for named, versioned cache buckets. A bucket is a flat
//! collection of url -> response pairs; the set of buckets is what the
//! activation pass prunes by name.

mod bucket;
mod disk;
mod memory;

pub use bucket::{BucketStore, StoreResult};
pub use disk::DiskStore;
pub use memory::MemoryStore;
