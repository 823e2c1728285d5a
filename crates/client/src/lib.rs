//! Outbound adapters for tipcheck.
//!
//! This crate provides the HTTP-backed implementations of the core
//! capability traits (cast resolver, tip ledgers, REST key/value store),
//! the allowance client, and wiring shared by the server and CLI.

pub mod allowance;
pub mod error;
pub mod http;
pub mod kv;
pub mod ledger;
pub mod neynar;
pub mod services;

pub use allowance::{AllowanceClient, AllowanceConfig, AllowanceData};
pub use error::UpstreamError;
pub use http::HttpSettings;
pub use kv::{RestKvConfig, RestKvStore};
pub use ledger::{AmountLedger, LedgerConfig, StatusLedger};
pub use neynar::{NeynarClient, NeynarConfig};
pub use services::{build_validation_service, open_store};
