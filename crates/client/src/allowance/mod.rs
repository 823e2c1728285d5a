//! degen.tips daily allowance client.
//!
//! `GET {allowance_url}?fid=<fid>` returns a list of snapshot records; the
//! first one carries today's figures. Nothing here is cached.

pub mod response;

pub use response::{AllowanceData, AllowanceRecord};

use chrono::{DateTime, Days, Utc};
use reqwest::header;
use tipcheck_core::AppConfig;

use crate::UpstreamError;
use crate::http::{HttpSettings, check_status};

const DEFAULT_ALLOWANCE_URL: &str = "https://api.degen.tips/airdrop2/allowances";

#[derive(Debug, Clone)]
pub struct AllowanceConfig {
    pub url: String,
    pub http: HttpSettings,
}

impl Default for AllowanceConfig {
    fn default() -> Self {
        Self { url: DEFAULT_ALLOWANCE_URL.to_string(), http: HttpSettings::default() }
    }
}

impl From<&AppConfig> for AllowanceConfig {
    fn from(config: &AppConfig) -> Self {
        Self { url: config.allowance_url.clone(), http: HttpSettings::from(config) }
    }
}

/// Allowances reset daily at midnight UTC.
pub fn next_utc_midnight(now: DateTime<Utc>) -> Option<i64> {
    let midnight = now.date_naive().checked_add_days(Days::new(1))?.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp_millis())
}

#[derive(Debug, Clone)]
pub struct AllowanceClient {
    http: reqwest::Client,
    config: AllowanceConfig,
}

impl AllowanceClient {
    pub fn new(config: AllowanceConfig) -> Result<Self, UpstreamError> {
        let http = config.http.build_client()?;
        Ok(Self { http, config })
    }

    /// Raw snapshot records for a user. A 404 reads as no records.
    pub async fn fetch(&self, fid: u64) -> Result<Vec<AllowanceRecord>, UpstreamError> {
        tracing::debug!(fid, "fetching allowance");

        let response = self
            .http
            .get(&self.config.url)
            .header(header::ACCEPT, "application/json")
            .query(&[("fid", fid)])
            .send()
            .await?;

        match check_status(response.status()) {
            Err(UpstreamError::NotFound) => return Ok(Vec::new()),
            other => other?,
        }

        let bytes = response.bytes().await?;
        let records: Option<Vec<AllowanceRecord>> =
            serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Parse(e.to_string()))?;
        Ok(records.unwrap_or_default())
    }

    /// Today's allowance, or `None` when the upstream has no usable figures.
    pub async fn allowance(&self, fid: u64) -> Result<Option<AllowanceData>, UpstreamError> {
        let records = self.fetch(fid).await?;
        Ok(records.first().and_then(AllowanceRecord::figures).map(|(allowance, remaining)| AllowanceData {
            allowance,
            remaining,
            expiration_timestamp: next_utc_midnight(Utc::now()),
        }))
    }
}
