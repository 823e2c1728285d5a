//! Shared outbound HTTP settings.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tipcheck_core::AppConfig;

use crate::UpstreamError;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "tipcheck/0.1";

/// Transport settings common to every upstream client.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    /// Upper bound on each outbound call; no call may hang past it.
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { user_agent: DEFAULT_USER_AGENT.to_string(), timeout: DEFAULT_TIMEOUT }
    }
}

impl From<&AppConfig> for HttpSettings {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout() }
    }
}

impl HttpSettings {
    pub(crate) fn build_client(&self) -> Result<Client, UpstreamError> {
        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| UpstreamError::Network(Arc::new(e)))
    }
}

/// Map non-success statuses onto [`UpstreamError`].
pub(crate) fn check_status(status: StatusCode) -> Result<(), UpstreamError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(UpstreamError::NotFound),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(UpstreamError::AuthError),
        StatusCode::TOO_MANY_REQUESTS => Err(UpstreamError::RateLimited),
        s => Err(UpstreamError::HttpError { status: s.as_u16() }),
    }
}
