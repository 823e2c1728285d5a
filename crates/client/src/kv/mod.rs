//! REST key/value store speaking the Upstash Redis REST protocol.
//!
//! Commands are POSTed to the endpoint root as a JSON array
//! (`["GET", key]`, `["SET", key, value, "EX", secs]`) with a bearer token.
//! Replies are `{"result": ...}` on success and `{"error": "..."}` on failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tipcheck_core::{AppConfig, Error, KvStore};

use crate::UpstreamError;
use crate::http::HttpSettings;

/// REST store configuration.
#[derive(Debug, Clone)]
pub struct RestKvConfig {
    pub url: String,
    pub token: String,
    pub http: HttpSettings,
}

impl RestKvConfig {
    /// Build from the application config, if both the endpoint and token are set.
    pub fn from_app(config: &AppConfig) -> Option<Self> {
        config.rest_store().map(|(url, token)| Self {
            url: url.to_string(),
            token: token.to_string(),
            http: HttpSettings::from(config),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CommandReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Remote key/value store client.
#[derive(Debug, Clone)]
pub struct RestKvStore {
    http: reqwest::Client,
    config: RestKvConfig,
}

impl RestKvStore {
    pub fn new(config: RestKvConfig) -> Result<Self, UpstreamError> {
        let http = config.http.build_client()?;
        Ok(Self { http, config })
    }

    /// Run one command and return its `result`.
    async fn command(&self, args: &[&str]) -> Result<Option<Value>, UpstreamError> {
        let response = self
            .http
            .post(&self.config.url)
            .bearer_auth(&self.config.token)
            .json(args)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let reply: CommandReply = serde_json::from_slice(&bytes).map_err(|e| match status.is_success() {
            true => UpstreamError::Parse(e.to_string()),
            false => UpstreamError::HttpError { status: status.as_u16() },
        })?;

        if let Some(error) = reply.error {
            return Err(UpstreamError::Store(error));
        }
        if !status.is_success() {
            return Err(UpstreamError::HttpError { status: status.as_u16() });
        }
        Ok(reply.result.filter(|v| !v.is_null()))
    }
}

#[async_trait]
impl KvStore for RestKvStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match self.command(&["GET", key]).await? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let secs = ttl.as_secs().max(1).to_string();
        self.command(&["SET", key, value, "EX", &secs]).await?;
        Ok(())
    }
}
