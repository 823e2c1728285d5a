//! Dual-ledger tip reconciliation.
//!
//! Two independent ledgers are queried concurrently and merged:
//! presence is granted by either ledger, the amount prefers the amount ledger,
//! and absence requires both ledgers to report nothing.

use std::sync::Arc;

use async_trait::async_trait;

use super::types::{ContentHash, LedgerEntry, ValidationOutcome};

/// A tip ledger queried by content hash.
///
/// Implementations must contain their own transport and parse failures and
/// report them as [`LedgerEntry::Absent`].
#[async_trait]
pub trait TipLedger: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn lookup_tip(&self, hash: &ContentHash) -> LedgerEntry;
}

/// Reconciled tip state for a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipVerdict {
    /// A ledger confirmed a settled amount.
    Settled { amount: u64 },
    /// At least one ledger holds a record but no amount could be confirmed.
    Recorded,
    /// Neither ledger knows the cast.
    NotRecorded,
}

impl From<TipVerdict> for ValidationOutcome {
    fn from(verdict: TipVerdict) -> Self {
        match verdict {
            TipVerdict::Settled { amount } => ValidationOutcome::tipped(amount),
            TipVerdict::Recorded | TipVerdict::NotRecorded => ValidationOutcome::default(),
        }
    }
}

/// Merge the amount ledger's entry with the status ledger's entry.
pub fn reconcile_entries(amounts: LedgerEntry, status: LedgerEntry) -> TipVerdict {
    match (amounts, status) {
        (LedgerEntry::Valid { amount }, _) => TipVerdict::Settled { amount },
        (LedgerEntry::Invalid | LedgerEntry::Absent, LedgerEntry::Valid { amount }) => TipVerdict::Settled { amount },
        (LedgerEntry::Invalid, LedgerEntry::Invalid | LedgerEntry::Absent) => TipVerdict::Recorded,
        (LedgerEntry::Absent, LedgerEntry::Invalid) => TipVerdict::Recorded,
        (LedgerEntry::Absent, LedgerEntry::Absent) => TipVerdict::NotRecorded,
    }
}

/// Fans a lookup out to both ledgers and merges the answers.
#[derive(Clone)]
pub struct TipReconciler {
    amounts: Arc<dyn TipLedger>,
    status: Arc<dyn TipLedger>,
}

impl TipReconciler {
    /// `amounts` is the ledger trusted for amounts (LedgerA), `status` the ledger trusted for status (LedgerB).
    pub fn new(amounts: Arc<dyn TipLedger>, status: Arc<dyn TipLedger>) -> Self {
        Self { amounts, status }
    }

    /// Query both ledgers concurrently and wait for both to settle.
    pub async fn reconcile(&self, hash: &ContentHash) -> TipVerdict {
        let (a, b) = tokio::join!(self.amounts.lookup_tip(hash), self.status.lookup_tip(hash));

        let verdict = reconcile_entries(a, b);
        tracing::debug!(
            hash = %hash,
            amount_ledger = self.amounts.name(),
            amount_entry = ?a,
            status_ledger = self.status.name(),
            status_entry = ?b,
            verdict = ?verdict,
            "reconciled tip ledgers"
        );
        verdict
    }
}
