//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Upper bound for either cache TTL: one year.
pub const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - either TTL is zero or longer than [`MAX_TTL_SECS`]
    /// - `user_agent` is empty
    /// - `bind_addr` is not a socket address
    ///
    /// Returns `ConfigError::Missing` if only one of the REST store settings is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        let ttls = [("positive_ttl_secs", self.positive_ttl_secs), ("negative_ttl_secs", self.negative_ttl_secs)];
        for (field, secs) in ttls {
            if secs == 0 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be greater than 0".into() });
            }
            if secs > MAX_TTL_SECS {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: format!("must not exceed 365 days ({MAX_TTL_SECS}s)"),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        self.bind_addr()?;

        match (&self.redis_api_url, &self.redis_api_token) {
            (Some(_), None) => {
                return Err(ConfigError::Missing {
                    field: "redis_api_token".into(),
                    hint: "Set TIPCHECK_REDIS_API_TOKEN alongside TIPCHECK_REDIS_API_URL".into(),
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::Missing {
                    field: "redis_api_url".into(),
                    hint: "Set TIPCHECK_REDIS_API_URL alongside TIPCHECK_REDIS_API_TOKEN".into(),
                });
            }
            _ => {}
        }

        if self.negative_ttl_secs > self.positive_ttl_secs {
            tracing::warn!(
                negative_ttl_secs = self.negative_ttl_secs,
                positive_ttl_secs = self.positive_ttl_secs,
                "negative cache TTL exceeds the confirmed TTL; unconfirmed tips will be rechecked less often"
            );
        }

        if self.api_key.is_none() {
            tracing::warn!("api_key is not set; every request will be rejected as unauthorized");
        }

        Ok(())
    }
}
