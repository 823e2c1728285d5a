//! degen.tips per-cast tip status ledger.
//!
//! `GET <url>/<cast hash>` answers with a list of tip records for the cast,
//! each carrying a `tip_status` and usually a `tip_amount`. An empty list or a
//! 404 means the ledger has not recorded the cast.

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use tipcheck_core::{AppConfig, ContentHash, LedgerEntry, TipLedger};

use super::{LedgerConfig, RawAmount};
use crate::UpstreamError;
use crate::http::{HttpSettings, check_status};

/// Status string the ledger uses for a settled tip.
const VALID_STATUS: &str = "valid";

/// One tip record from the status ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct TipStatusRecord {
    #[serde(default)]
    pub cast_hash: Option<String>,
    #[serde(default)]
    pub tip_status: Option<String>,
    #[serde(default)]
    pub tip_amount: Option<RawAmount>,
}

impl TipStatusRecord {
    /// A record is valid only with the valid status and a usable amount.
    pub fn entry(&self) -> LedgerEntry {
        let valid = self.tip_status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(VALID_STATUS));
        match (valid, self.tip_amount.as_ref().and_then(RawAmount::to_amount)) {
            (true, Some(amount)) => LedgerEntry::Valid { amount },
            _ => LedgerEntry::Invalid,
        }
    }
}

/// Collapse all records for a cast into one entry, preferring a valid one.
pub fn summarize(records: &[TipStatusRecord]) -> LedgerEntry {
    let mut summary = LedgerEntry::Absent;
    for entry in records.iter().map(TipStatusRecord::entry) {
        match entry {
            LedgerEntry::Valid { .. } => return entry,
            LedgerEntry::Invalid => summary = LedgerEntry::Invalid,
            LedgerEntry::Absent => {}
        }
    }
    summary
}

impl LedgerConfig {
    pub fn status(config: &AppConfig) -> Self {
        Self { url: config.status_ledger_url.clone(), http: HttpSettings::from(config) }
    }
}

/// LedgerB: the ledger trusted for tip status.
#[derive(Debug, Clone)]
pub struct StatusLedger {
    http: reqwest::Client,
    url: String,
}

impl StatusLedger {
    pub fn new(config: LedgerConfig) -> Result<Self, UpstreamError> {
        Ok(Self { http: config.http.build_client()?, url: config.url })
    }

    /// Fetch every record for a cast hash.
    pub async fn fetch(&self, hash: &ContentHash) -> Result<Vec<TipStatusRecord>, UpstreamError> {
        let url = format!("{}/{}", self.url.trim_end_matches('/'), hash.as_str());
        let response = self.http.get(&url).header(header::ACCEPT, "application/json").send().await?;

        match check_status(response.status()) {
            Err(UpstreamError::NotFound) => return Ok(Vec::new()),
            other => other?,
        }

        let bytes = response.bytes().await?;
        let records: Option<Vec<TipStatusRecord>> =
            serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Parse(e.to_string()))?;
        Ok(records.unwrap_or_default())
    }
}

#[async_trait]
impl TipLedger for StatusLedger {
    fn name(&self) -> &'static str {
        "degen.tips"
    }

    async fn lookup_tip(&self, hash: &ContentHash) -> LedgerEntry {
        match self.fetch(hash).await {
            Ok(records) => summarize(&records),
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

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;

    fn ledger(server: &MockServer) -> StatusLedger {
        StatusLedger::new(LedgerConfig { url: server.url("/tips/cast"), http: HttpSettings::default() }).unwrap()
    }

    fn record(status: &str, amount: Option<&str>) -> TipStatusRecord {
        TipStatusRecord {
            cast_hash: Some("0xabc".into()),
            tip_status: Some(status.into()),
            tip_amount: amount.map(|a| RawAmount::Text(a.into())),
        }
    }

    #[test]
    fn test_record_entry() {
        assert_eq!(record("valid", Some("150")).entry(), LedgerEntry::Valid { amount: 150 });
        assert_eq!(record("VALID", Some("150")).entry(), LedgerEntry::Valid { amount: 150 });
        assert_eq!(record("valid", None).entry(), LedgerEntry::Invalid);
        assert_eq!(record("insufficient_allowance", Some("150")).entry(), LedgerEntry::Invalid);
    }

    #[test]
    fn test_summarize_prefers_valid() {
        assert_eq!(summarize(&[]), LedgerEntry::Absent);
        assert_eq!(summarize(&[record("invalid", None)]), LedgerEntry::Invalid);
        assert_eq!(
            summarize(&[record("invalid", None), record("valid", Some("9"))]),
            LedgerEntry::Valid { amount: 9 }
        );
    }

    #[tokio::test]
    async fn test_lookup_valid_record() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/tips/cast/0xabc");
                then.status(200)
                    .json_body(json!([{"cast_hash": "0xabc", "tip_status": "valid", "tip_amount": "150"}]));
            })
            .await;

        let entry = ledger(&server).lookup_tip(&ContentHash::new("0xabc")).await;

        assert_eq!(entry, LedgerEntry::Valid { amount: 150 });
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lookup_empty_and_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/tips/cast/0xempty");
                then.status(200).json_body(json!([]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.path("/tips/cast/0xmissing");
                then.status(404);
            })
            .await;

        let ledger = ledger(&server);
        assert_eq!(ledger.lookup_tip(&ContentHash::new("0xempty")).await, LedgerEntry::Absent);
        assert_eq!(ledger.lookup_tip(&ContentHash::new("0xmissing")).await, LedgerEntry::Absent);
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades_to_absent() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/tips/cast/0xabc");
                then.status(502);
            })
            .await;

        assert_eq!(ledger(&server).lookup_tip(&ContentHash::new("0xabc")).await, LedgerEntry::Absent);
    }
}
