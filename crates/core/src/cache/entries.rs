//! Key/value entries with expiry in the local SQLite cache.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{params, rusqlite};

use super::connection::CacheDb;
use super::hash::key_hash;
use super::store::KvStore;
use crate::Error;

/// Timestamps are stored fixed-width so they compare correctly as text.
fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Bookkeeping columns of a cached entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMeta {
    pub cache_key: String,
    pub stored_at: String,
    pub expires_at: String,
}

impl CacheDb {
    /// Get an unexpired entry by key.
    pub async fn get_entry(&self, key: &str) -> Result<Option<String>, Error> {
        let key_hash = key_hash(key);
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let result = conn.query_row(
                    "SELECT value_json FROM kv_cache WHERE key_hash = ?1 AND expires_at > ?2",
                    params![key_hash, now],
                    |row| row.get(0),
                );

                match result {
                    Ok(json) => Ok(Some(json)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get entry metadata by key, expired or not.
    pub async fn get_entry_meta(&self, key: &str) -> Result<Option<EntryMeta>, Error> {
        let key_hash = key_hash(key);
        self.conn
            .call(move |conn| -> Result<Option<EntryMeta>, Error> {
                let result = conn.query_row(
                    "SELECT cache_key, stored_at, expires_at FROM kv_cache WHERE key_hash = ?1",
                    params![key_hash],
                    |row| Ok(EntryMeta { cache_key: row.get(0)?, stored_at: row.get(1)?, expires_at: row.get(2)? }),
                );

                match result {
                    Ok(meta) => Ok(Some(meta)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace an entry that expires after `ttl`.
    pub async fn put_entry(&self, key: &str, value_json: &str, ttl: Duration) -> Result<(), Error> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| Error::Store(format!("ttl out of range: {e}")))?;
        let key_hash = key_hash(key);
        let cache_key = key.to_string();
        let value_json = value_json.to_string();
        let stored = Utc::now();
        let stored_at = timestamp(stored);
        let expires_at = stored
            .checked_add_signed(ttl)
            .map(timestamp)
            .ok_or_else(|| Error::Store(format!("ttl of {}s overflows the expiry timestamp", ttl.num_seconds())))?;

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_cache (key_hash, cache_key, value_json, stored_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        cache_key = excluded.cache_key,
                        value_json = excluded.value_json,
                        stored_at = excluded.stored_at,
                        expires_at = excluded.expires_at",
                    params![key_hash, cache_key, value_json, stored_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired entries, returning how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM kv_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl KvStore for CacheDb {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.get_entry(key).await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        self.put_entry(key, value, ttl).await
    }
}
