//! Tip validation: data model, cast resolution, ledger reconciliation and the validation service.

pub mod reconcile;
pub mod resolver;
pub mod service;
pub mod types;

pub use reconcile::{TipLedger, TipReconciler, TipVerdict, reconcile_entries};
pub use resolver::CastResolver;
pub use service::{TtlPolicy, ValidationService};
pub use types::{CACHE_KEY_PREFIX, CacheEntry, CastReference, ContentHash, LedgerEntry, ValidationOutcome};
