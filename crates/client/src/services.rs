//! Wiring of the validation service from configuration.

use std::sync::Arc;

use tipcheck_core::{AppConfig, Authorizer, CacheAside, CacheDb, KvStore, TipReconciler, ValidationService};

use crate::UpstreamError;
use crate::kv::{RestKvConfig, RestKvStore};
use crate::ledger::{AmountLedger, LedgerConfig, StatusLedger};
use crate::neynar::{NeynarClient, NeynarConfig};

/// Pick the backing store once: the REST store when configured, otherwise
/// SQLite at `db_path`, otherwise none. A store that fails to open is skipped.
pub async fn open_store(config: &AppConfig) -> Option<Arc<dyn KvStore>> {
    if let Some(rest) = RestKvConfig::from_app(config) {
        return match RestKvStore::new(rest) {
            Ok(store) => {
                tracing::info!(store = "rest", "cache store enabled");
                Some(Arc::new(store))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to build REST store, caching disabled");
                None
            }
        };
    }

    if let Some(path) = &config.db_path {
        return match CacheDb::open(path).await {
            Ok(db) => {
                tracing::info!(store = "sqlite", path = %path.display(), "cache store enabled");
                Some(Arc::new(db))
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "failed to open cache database, caching disabled");
                None
            }
        };
    }

    tracing::info!("no cache store configured, caching disabled");
    None
}

/// Build a [`ValidationService`] against the configured upstreams.
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be constructed.
pub async fn build_validation_service(config: &AppConfig) -> Result<ValidationService, UpstreamError> {
    if let Err(e) = config.require_neynar_api_key() {
        tracing::warn!(error = %e, "cast resolution will fail until a Neynar key is configured");
    }

    let resolver = NeynarClient::new(NeynarConfig::from(config))?;
    let amounts = AmountLedger::new(LedgerConfig::amounts(config))?;
    let status = StatusLedger::new(LedgerConfig::status(config))?;
    let store = open_store(config).await;

    Ok(ValidationService::new(
        Authorizer::new(config.api_key.clone()),
        Arc::new(resolver),
        TipReconciler::new(Arc::new(amounts), Arc::new(status)),
        CacheAside::new(store),
        config.ttl_policy(),
    ))
}
