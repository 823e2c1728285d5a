//! Tip validation data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Versioned namespace for validation cache keys.
pub const CACHE_KEY_PREFIX: &str = "tip/v1/";

/// Caller-supplied URL identifying a cast.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CastReference(String);

impl CastReference {
    /// Wrap a cast URL, rejecting empty input.
    pub fn parse(url: impl Into<String>) -> Result<Self, Error> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::BadRequest("Missing castUrl".into()));
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespaced cache key; the URL is used verbatim.
    pub fn cache_key(&self) -> String {
        format!("{CACHE_KEY_PREFIX}{}", self.0)
    }
}

impl fmt::Display for CastReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger-addressable identifier of a cast. Opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized answer from a single tip ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEntry {
    /// The ledger confirms a settled tip of `amount`.
    Valid { amount: u64 },
    /// The ledger holds a record for the cast that is not a valid settled tip.
    Invalid,
    /// No record, or the ledger could not be queried.
    Absent,
}

impl LedgerEntry {
    pub fn is_absent(&self) -> bool {
        matches!(self, LedgerEntry::Absent)
    }

    pub fn amount(&self) -> Option<u64> {
        match self {
            LedgerEntry::Valid { amount } => Some(*amount),
            _ => None,
        }
    }
}

/// Reconciled result returned to callers.
///
/// `amount: None` means "not a validated tip".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
}

impl ValidationOutcome {
    pub fn tipped(amount: u64) -> Self {
        Self { amount: Some(amount) }
    }

    pub fn is_confirmed(&self) -> bool {
        self.amount.is_some()
    }
}

/// Value persisted in the key/value store for a cast.
///
/// `data: None` records that the cast itself could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ValidationOutcome>,
    /// Creation time in unix milliseconds.
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn resolved(outcome: ValidationOutcome) -> Self {
        Self { data: Some(outcome), timestamp: chrono::Utc::now().timestamp_millis() }
    }

    pub fn cast_not_found() -> Self {
        Self { data: None, timestamp: chrono::Utc::now().timestamp_millis() }
    }

    /// Outcome seen by a cache reader; a not-found marker reads as "not a tip".
    pub fn outcome(&self) -> ValidationOutcome {
        self.data.unwrap_or_default()
    }
}
