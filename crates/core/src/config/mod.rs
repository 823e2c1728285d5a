//! Application configuration with layered loading.
//!
//! Configuration is loaded with figment from multiple sources:
//!
//! 1. Environment variables (TIPCHECK_*)
//! 2. TOML config file (if TIPCHECK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::tip::TtlPolicy;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (TIPCHECK_*)
/// 2. TOML config file (if TIPCHECK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared secret callers must present in the `x-dte-api-key` header.
    ///
    /// Set via TIPCHECK_API_KEY. When unset every request is rejected.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Neynar API key used to resolve cast URLs.
    ///
    /// Set via TIPCHECK_NEYNAR_API_KEY. Required only when a cast is resolved.
    #[serde(default)]
    pub neynar_api_key: Option<String>,

    /// Upstash-style REST endpoint for the key/value cache.
    ///
    /// Set via TIPCHECK_REDIS_API_URL.
    #[serde(default)]
    pub redis_api_url: Option<String>,

    /// Access token for the REST key/value cache.
    ///
    /// Set via TIPCHECK_REDIS_API_TOKEN.
    #[serde(default)]
    pub redis_api_token: Option<String>,

    /// Path to a local SQLite cache, used when no REST store is configured.
    ///
    /// Set via TIPCHECK_DB_PATH.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Address the HTTP server binds to.
    ///
    /// Set via TIPCHECK_BIND_ADDR.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// User-Agent string for outbound HTTP requests.
    ///
    /// Set via TIPCHECK_USER_AGENT.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Outbound HTTP request timeout in milliseconds.
    ///
    /// Set via TIPCHECK_TIMEOUT_MS.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// TTL in seconds for cache entries carrying a validated amount.
    #[serde(default = "default_positive_ttl_secs")]
    pub positive_ttl_secs: u64,

    /// TTL in seconds for "no cast" and "no valid tip" cache entries.
    #[serde(default = "default_negative_ttl_secs")]
    pub negative_ttl_secs: u64,

    #[serde(default = "default_neynar_base_url")]
    pub neynar_base_url: String,

    #[serde(default = "default_amount_ledger_url")]
    pub amount_ledger_url: String,

    #[serde(default = "default_status_ledger_url")]
    pub status_ledger_url: String,

    #[serde(default = "default_allowance_url")]
    pub allowance_url: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".into()
}

fn default_user_agent() -> String {
    "tipcheck/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_positive_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_negative_ttl_secs() -> u64 {
    10 * 60
}

fn default_neynar_base_url() -> String {
    "https://api.neynar.com".into()
}

fn default_amount_ledger_url() -> String {
    "https://www.degentip.me/api/get_degen_successful_tips".into()
}

fn default_status_ledger_url() -> String {
    "https://api.degen.tips/tips/cast".into()
}

fn default_allowance_url() -> String {
    "https://api.degen.tips/airdrop2/allowances".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            neynar_api_key: None,
            redis_api_url: None,
            redis_api_token: None,
            db_path: None,
            bind_addr: default_bind_addr(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            positive_ttl_secs: default_positive_ttl_secs(),
            negative_ttl_secs: default_negative_ttl_secs(),
            neynar_base_url: default_neynar_base_url(),
            amount_ledger_url: default_amount_ledger_url(),
            status_ledger_url: default_status_ledger_url(),
            allowance_url: default_allowance_url(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// TTL policy derived from the configured seconds.
    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy {
            confirmed: Duration::from_secs(self.positive_ttl_secs),
            negative: Duration::from_secs(self.negative_ttl_secs),
        }
    }

    /// Parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `bind_addr` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            field: "bind_addr".into(),
            reason: e.to_string(),
        })
    }

    /// REST store endpoint and token, if both are configured.
    pub fn rest_store(&self) -> Option<(&str, &str)> {
        match (self.redis_api_url.as_deref(), self.redis_api_token.as_deref()) {
            (Some(url), Some(token)) if !url.is_empty() && !token.is_empty() => Some((url, token)),
            _ => None,
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `TIPCHECK_`
    /// 2. TOML file from `TIPCHECK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("TIPCHECK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("TIPCHECK_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the Neynar API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the Neynar API key is not set.
    pub fn require_neynar_api_key(&self) -> Result<&str, ConfigError> {
        self.neynar_api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "neynar_api_key".into(),
            hint: "Set TIPCHECK_NEYNAR_API_KEY environment variable".into(),
        })
    }
}
