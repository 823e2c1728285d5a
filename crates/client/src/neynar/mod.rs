//! Neynar cast resolver.
//!
//! Resolves a cast URL to its hash via `GET /v2/farcaster/cast?identifier=<url>&type=url`,
//! authenticated with the `api_key` header. One request per resolution, no retries.

pub mod response;

pub use response::{Cast, CastLookupResponse};

use async_trait::async_trait;
use reqwest::header;
use tipcheck_core::{AppConfig, CastReference, CastResolver, ContentHash, Error};

use crate::UpstreamError;
use crate::http::{HttpSettings, check_status};

/// Default base URL for the Neynar API.
const DEFAULT_BASE_URL: &str = "https://api.neynar.com";

/// Neynar client configuration.
#[derive(Debug, Clone)]
pub struct NeynarConfig {
    /// API key; resolution fails as unavailable without it.
    pub api_key: Option<String>,
    pub base_url: String,
    pub http: HttpSettings,
}

impl Default for NeynarConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: DEFAULT_BASE_URL.to_string(), http: HttpSettings::default() }
    }
}

impl From<&AppConfig> for NeynarConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.neynar_api_key.clone().filter(|k| !k.is_empty()),
            base_url: config.neynar_base_url.clone(),
            http: HttpSettings::from(config),
        }
    }
}

/// Neynar API client.
#[derive(Debug, Clone)]
pub struct NeynarClient {
    http: reqwest::Client,
    config: NeynarConfig,
}

impl NeynarClient {
    pub fn new(config: NeynarConfig) -> Result<Self, UpstreamError> {
        let http = config.http.build_client()?;
        Ok(Self { http, config })
    }

    /// Look up a cast by its URL.
    pub async fn lookup_cast(&self, cast_url: &str) -> Result<Cast, UpstreamError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey("TIPCHECK_NEYNAR_API_KEY"))?;

        let url = format!("{}/v2/farcaster/cast", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(cast_url, "resolving cast via Neynar");

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header("api_key", api_key)
            .query(&[("identifier", cast_url), ("type", "url")])
            .send()
            .await?;

        check_status(response.status())?;

        let bytes = response.bytes().await?;
        let body: CastLookupResponse =
            serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Parse(e.to_string()))?;

        body.cast.ok_or(UpstreamError::NotFound)
    }
}

#[async_trait]
impl CastResolver for NeynarClient {
    async fn resolve(&self, cast: &CastReference) -> Result<ContentHash, Error> {
        match self.lookup_cast(cast.as_str()).await {
            Ok(found) => Ok(ContentHash::new(found.hash)),
            Err(UpstreamError::NotFound) => Err(Error::NotFound(format!("Cast not found: {cast}"))),
            Err(e) => {
                tracing::warn!(cast = %cast, error = %e, "cast resolution failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;

    const CAST_URL: &str = "https://warpcast.com/alice/0xabc123";

    fn client(server: &MockServer, api_key: Option<&str>) -> NeynarClient {
        NeynarClient::new(NeynarConfig {
            api_key: api_key.map(str::to_string),
            base_url: server.base_url(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_returns_hash() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/v2/farcaster/cast")
                    .query_param("identifier", CAST_URL)
                    .query_param("type", "url")
                    .header("api_key", "neynar-key");
                then.status(200).json_body(json!({"cast": {"hash": "0xfeed", "text": "hi"}}));
            })
            .await;

        let cast = CastReference::parse(CAST_URL).unwrap();
        let hash = client(&server, Some("neynar-key")).resolve(&cast).await.unwrap();

        assert_eq!(hash.as_str(), "0xfeed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_resolve_not_found_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/v2/farcaster/cast");
                then.status(404).json_body(json!({"message": "Cast not found"}));
            })
            .await;

        let cast = CastReference::parse(CAST_URL).unwrap();
        let result = client(&server, Some("k")).resolve(&cast).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_missing_cast_field() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/v2/farcaster/cast");
                then.status(200).json_body(json!({}));
            })
            .await;

        let cast = CastReference::parse(CAST_URL).unwrap();
        let result = client(&server, Some("k")).resolve(&cast).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_without_api_key_is_unavailable() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.path("/v2/farcaster/cast");
                then.status(200).json_body(json!({"cast": {"hash": "0xfeed"}}));
            })
            .await;

        let cast = CastReference::parse(CAST_URL).unwrap();
        let result = client(&server, None).resolve(&cast).await;

        assert!(matches!(result, Err(Error::UpstreamUnavailable(_))));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_resolve_server_error_is_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/v2/farcaster/cast");
                then.status(503);
            })
            .await;

        let cast = CastReference::parse(CAST_URL).unwrap();
        let result = client(&server, Some("k")).resolve(&cast).await;
        assert!(matches!(result, Err(Error::UpstreamUnavailable(_))));
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { neynar_api_key: Some(String::new()), ..Default::default() };
        assert!(NeynarConfig::from(&app).api_key.is_none());

        let app = AppConfig { neynar_api_key: Some("k".into()), ..Default::default() };
        let config = NeynarConfig::from(&app);
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.base_url, "https://api.neynar.com");
    }
}
