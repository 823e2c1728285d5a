//! Core types and shared functionality for tipcheck.
//!
//! This crate provides:
//! - Tip validation domain types, ledger reconciliation and the validation service
//! - Cache-aside layer with a SQLite backend
//! - Caller authorization
//! - Unified error types
//! - Configuration structures

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod tip;

pub use auth::Authorizer;
pub use cache::{CacheAside, CacheDb, KvStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use tip::{
    CastReference, CastResolver, ContentHash, LedgerEntry, TipLedger, TipReconciler, TtlPolicy, ValidationOutcome,
    ValidationService,
};
