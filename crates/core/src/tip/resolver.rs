//! Cast URL to content hash resolution.

use async_trait::async_trait;

use super::types::{CastReference, ContentHash};
use crate::Error;

/// Resolves a cast URL to the hash the ledgers are keyed by.
///
/// One outbound call, no retries. Implementations fail with
/// [`Error::UpstreamUnavailable`] when their credential is missing or the
/// upstream is down, and with [`Error::NotFound`] when the upstream reports
/// no matching cast.
#[async_trait]
pub trait CastResolver: Send + Sync {
    async fn resolve(&self, cast: &CastReference) -> Result<ContentHash, Error>;
}
