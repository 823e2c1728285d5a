//! Tip ledger adapters.
//!
//! Each adapter queries one external ledger by cast hash and normalizes the
//! answer into a [`LedgerEntry`](tipcheck_core::LedgerEntry). Transport and
//! parse failures never escape an adapter: they are logged and reported as
//! `Absent`. No retries and no caching happen here.
//!
//! - [`AmountLedger`]: degentip.me successful-tips API, trusted for amounts (LedgerA)
//! - [`StatusLedger`]: degen.tips per-cast tip status API, trusted for status (LedgerB)

pub mod amounts;
pub mod status;

pub use amounts::{AmountLedger, SuccessfulTip};
pub use status::{StatusLedger, TipStatusRecord};

use serde::Deserialize;

use crate::http::HttpSettings;

/// Ledger client configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub url: String,
    pub http: HttpSettings,
}

/// Tip amount as reported by a ledger; either a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    /// Non-negative whole amount, if the raw value is one.
    pub fn to_amount(&self) -> Option<u64> {
        match self {
            RawAmount::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64 => {
                Some(*n as u64)
            }
            RawAmount::Number(_) => None,
            RawAmount::Text(s) => s.trim().parse().ok(),
        }
    }
}
