//! degentip.me successful-tips ledger.
//!
//! `GET <url>?hash=<cast hash>` answers with the settled tip for the cast,
//! `null` when it knows nothing about it.

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use tipcheck_core::{AppConfig, ContentHash, LedgerEntry, TipLedger};

use super::{LedgerConfig, RawAmount};
use crate::UpstreamError;
use crate::http::{HttpSettings, check_status};

/// A settled tip record.
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessfulTip {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub fid: Option<u64>,
    #[serde(default)]
    pub tip_amount: Option<RawAmount>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SuccessfulTip {
    fn is_empty(&self) -> bool {
        self.username.is_none() && self.fid.is_none() && self.tip_amount.is_none() && self.timestamp.is_none()
    }

    /// A record with a usable amount is valid; a record without one is invalid.
    pub fn entry(&self) -> LedgerEntry {
        if self.is_empty() {
            return LedgerEntry::Absent;
        }
        match self.tip_amount.as_ref().and_then(RawAmount::to_amount) {
            Some(amount) => LedgerEntry::Valid { amount },
            None => LedgerEntry::Invalid,
        }
    }
}

impl LedgerConfig {
    pub fn amounts(config: &AppConfig) -> Self {
        Self { url: config.amount_ledger_url.clone(), http: HttpSettings::from(config) }
    }
}

/// LedgerA: the ledger trusted for tip amounts.
#[derive(Debug, Clone)]
pub struct AmountLedger {
    http: reqwest::Client,
    url: String,
}

impl AmountLedger {
    pub fn new(config: LedgerConfig) -> Result<Self, UpstreamError> {
        Ok(Self { http: config.http.build_client()?, url: config.url })
    }

    /// Fetch the raw record for a cast hash.
    pub async fn fetch(&self, hash: &ContentHash) -> Result<Option<SuccessfulTip>, UpstreamError> {
        let response = self
            .http
            .get(&self.url)
            .header(header::ACCEPT, "application/json")
            .query(&[("hash", hash.as_str())])
            .send()
            .await?;

        match check_status(response.status()) {
            Err(UpstreamError::NotFound) => return Ok(None),
            other => other?,
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Parse(e.to_string()))
    }
}

#[async_trait]
impl TipLedger for AmountLedger {
    fn name(&self) -> &'static str {
        "degentip.me"
    }

    async fn lookup_tip(&self, hash: &ContentHash) -> LedgerEntry {
        match self.fetch(hash).await {
            Ok(Some(tip)) => tip.entry(),
            Ok(None) => LedgerEntry::Absent,
            Err(e) => {
                tracing::warn!(
                    ledger = self.name(),
                    hash = %hash,
                    error = %e,
                    "ledger lookup failed, treating as absent"
                );
                LedgerEntry::Absent
            }
        }
    }
}
