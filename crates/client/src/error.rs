//! Upstream client error types.

use std::sync::Arc;

use tipcheck_core::Error;

/// Errors from the outbound HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// A credential required by the upstream is not configured.
    #[error("missing API key: {0} not set")]
    MissingApiKey(&'static str),

    /// The upstream reported no matching record.
    #[error("not found")]
    NotFound,

    /// The upstream rejected our credential.
    #[error("authentication failed")]
    AuthError,

    /// Rate limited by the upstream.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The key/value store answered with an error.
    #[error("store error: {0}")]
    Store(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { UpstreamError::Timeout } else { UpstreamError::Network(Arc::new(err)) }
    }
}

impl From<UpstreamError> for Error {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound => Error::NotFound("Cast not found".into()),
            UpstreamError::Store(msg) => Error::Store(msg),
            other => Error::UpstreamUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UpstreamError::MissingApiKey("TIPCHECK_NEYNAR_API_KEY");
        assert!(err.to_string().contains("TIPCHECK_NEYNAR_API_KEY"));

        let err = UpstreamError::HttpError { status: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_core_error_mapping() {
        assert!(matches!(Error::from(UpstreamError::NotFound), Error::NotFound(_)));
        assert!(matches!(Error::from(UpstreamError::Timeout), Error::UpstreamUnavailable(_)));
        assert!(matches!(Error::from(UpstreamError::MissingApiKey("X")), Error::UpstreamUnavailable(_)));
        assert!(matches!(Error::from(UpstreamError::Store("boom".into())), Error::Store(_)));
    }
}
