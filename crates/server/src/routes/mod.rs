//! Route handlers.

pub mod allowance;
pub mod validation;

use axum::http::HeaderMap;
use serde::Serialize;

/// Caller credential header.
pub const API_KEY_HEADER: &str = "x-dte-api-key";

/// Successful response envelope; `data` is omitted when there is nothing to report.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub(crate) fn credential(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}
