//! Neynar cast lookup response types.

use serde::Deserialize;

/// Raw response from `GET /v2/farcaster/cast`.
#[derive(Debug, Deserialize)]
pub struct CastLookupResponse {
    #[serde(default)]
    pub cast: Option<Cast>,
}

/// The subset of a Neynar cast we rely on.
#[derive(Debug, Deserialize)]
pub struct Cast {
    pub hash: String,
    #[serde(default)]
    pub text: Option<String>,
}
