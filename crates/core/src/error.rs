//! Unified error types for tipcheck.
//!
//! Variants map onto the HTTP status semantics of the validation boundary:
//! `Unauthorized` (401), `BadRequest` (400), `NotFound` (404), everything else (500).

use tokio_rusqlite::rusqlite;

/// Unified error type for the tip validation core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid caller credential.
    #[error("UNAUTHORIZED")]
    Unauthorized,

    /// Malformed request input (e.g., empty cast URL).
    #[error("BAD_REQUEST: {0}")]
    BadRequest(String),

    /// The upstream reported no matching content.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// A required upstream dependency is down or not configured.
    #[error("UPSTREAM_UNAVAILABLE: {0}")]
    UpstreamUnavailable(String),

    /// Remote key/value store failure.
    #[error("STORE_ERROR: {0}")]
    Store(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Cache payload could not be encoded or decoded.
    #[error("SERIALIZATION_ERROR: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether the error is the caller's fault rather than a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Unauthorized | Error::BadRequest(_) | Error::NotFound(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
