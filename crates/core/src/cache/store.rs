//! Cache-aside lookups over a pluggable key/value store.
//!
//! The store is an optional capability resolved once at startup. When it is
//! absent or failing, [`CacheAside`] degrades to calling the compute function
//! on every lookup; store errors never reach the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Error;

/// String key/value store with per-key expiry.
///
/// Writes are last-writer-wins per key. Expired keys read as missing.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error>;
}

/// Where a cache-aside value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// Served from the store; the compute function was not called.
    Hit(V),
    /// Computed on this call.
    Fresh(V),
}

/// Cache-aside front for an optional [`KvStore`].
#[derive(Clone, Default)]
pub struct CacheAside {
    store: Option<Arc<dyn KvStore>>,
}

impl CacheAside {
    pub fn new(store: Option<Arc<dyn KvStore>>) -> Self {
        Self { store }
    }

    /// A pass-through that never reads or writes.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Return the cached value for `key`, or compute, persist and return a fresh one.
    ///
    /// With `force_refresh` the read is skipped. `compute` runs at most once.
    /// `ttl_for` picks the expiry from the computed value. Errors from `compute`
    /// propagate and nothing is written; store errors are logged and ignored.
    pub async fn get_or_compute<V, F, Fut, T>(
        &self, key: &str, force_refresh: bool, compute: F, ttl_for: T,
    ) -> Result<Lookup<V>, Error>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, Error>>,
        T: FnOnce(&V) -> Duration,
    {
        if !force_refresh
            && let Some(store) = &self.store
            && let Some(value) = Self::read(store.as_ref(), key).await
        {
            tracing::debug!(key, store = store.name(), "cache hit");
            return Ok(Lookup::Hit(value));
        }

        let value = compute().await?;

        if let Some(store) = &self.store {
            let ttl = ttl_for(&value);
            match serde_json::to_string(&value) {
                Ok(json) => {
                    if let Err(e) = store.set_ex(key, &json, ttl).await {
                        tracing::warn!(key, store = store.name(), error = %e, "failed to cache computed value");
                    } else {
                        tracing::debug!(key, store = store.name(), ttl_secs = ttl.as_secs(), "cached computed value");
                    }
                }
                Err(e) => tracing::warn!(key, error = %e, "failed to encode computed value"),
            }
        }

        Ok(Lookup::Fresh(value))
    }

    async fn read<V: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<V> {
        match store.get(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(key, store = store.name(), error = %e, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key, store = store.name(), "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key, store = store.name(), error = %e, "cache read failed, computing live");
                None
            }
        }
    }
}

impl std::fmt::Debug for CacheAside {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside").field("store", &self.store.as_ref().map(|s| s.name())).finish()
    }
}
