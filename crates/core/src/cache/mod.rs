//! Validation result caching.
//!
//! - [`CacheAside`]: read-through/write-back wrapper over an optional [`KvStore`]
//! - [`CacheDb`]: local SQLite-backed [`KvStore`] with per-entry expiry
//!
//! Expiry is owned by the backing store; nothing is evicted early.

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::EntryMeta;
pub use store::{CacheAside, KvStore, Lookup};
